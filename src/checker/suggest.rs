// src/checker/suggest.rs
// =============================================================================
// "Did you mean ...?" suggestions for broken internal links.
//
// Every candidate path gets an additive score against the broken target
// (all comparisons lowercase):
//
//   +10  one string contains the other
//   +5   the candidate's file name contains the target's file name
//   +0..5  edit-distance similarity (only for strings under 50 chars)
//
// Candidates scoring 2 or less are dropped, the rest are sorted best-first
// and cut down to a handful.
// =============================================================================

// How many suggestions a broken link gets at most
pub const MAX_SUGGESTIONS: usize = 3;

// Scores at or below this are noise
const MIN_SCORE: f64 = 2.0;

// Edit distance is quadratic, so long paths skip it
const MAX_EDIT_DISTANCE_LEN: usize = 50;

// Ranks `candidates` by how likely each is the intended `target`
//
// Ties keep the order the candidates came in.
pub fn find_similar_paths<S: AsRef<str>>(target: &str, candidates: &[S], max: usize) -> Vec<String> {
    let mut scored: Vec<(&str, f64)> = candidates
        .iter()
        .map(|c| (c.as_ref(), score_candidate(target, c.as_ref())))
        .filter(|(_, score)| *score > MIN_SCORE)
        .collect();

    // sort_by is stable, which is what gives us the tie-break
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(max)
        .map(|(path, _)| path.to_string())
        .collect()
}

pub fn score_candidate(target: &str, candidate: &str) -> f64 {
    let target_lower = target.to_lowercase();
    let candidate_lower = candidate.to_lowercase();
    let mut score = 0.0;

    if candidate_lower.contains(&target_lower) || target_lower.contains(&candidate_lower) {
        score += 10.0;
    }

    if let (Some(target_file), Some(candidate_file)) =
        (last_segment(&target_lower), last_segment(&candidate_lower))
    {
        if candidate_file.contains(target_file) {
            score += 5.0;
        }
    }

    let target_len = target.chars().count();
    let candidate_len = candidate.chars().count();
    if target_len < MAX_EDIT_DISTANCE_LEN && candidate_len < MAX_EDIT_DISTANCE_LEN {
        let max_len = target_len.max(candidate_len);
        if max_len > 0 {
            let distance = levenshtein(&target_lower, &candidate_lower) as f64;
            score += ((1.0 - distance / max_len as f64) * 5.0).max(0.0);
        }
    }

    score
}

// Last non-empty '/'-separated segment
fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}

// Classic insert/delete/substitute edit distance, by characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // One rolling row is enough
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}
