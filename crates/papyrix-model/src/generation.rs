//! Deterministic beam-search decoding.
//!
//! Candle ships no `generate()`; this module implements the decoding loop
//! over a token-scoring closure so the search itself has no dependency on
//! model weights. The closure receives the decoder prefix (including the
//! start token) and returns log-probabilities over the vocabulary for the
//! next position.

use std::cmp::Ordering;

use crate::Result;

/// Fixed decoding parameters for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Maximum number of generated tokens (excluding the start token).
    pub max_length: usize,
    /// EOS is masked while the hypothesis is shorter than this.
    pub min_length: usize,
    pub num_beams: usize,
    /// Hypothesis score = sum of log-probs / len^length_penalty.
    pub length_penalty: f32,
    /// Stop as soon as `num_beams` hypotheses have finished.
    pub early_stopping: bool,
}

impl GenerationParams {
    /// Decoding parameters for document summarization.
    pub fn summarization() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            num_beams: 4,
            length_penalty: 2.0,
            early_stopping: true,
        }
    }

    /// Decoding parameters for question answering: longer output budget,
    /// no minimum length, no length penalty.
    pub fn answering() -> Self {
        Self {
            max_length: 600,
            min_length: 0,
            num_beams: 4,
            length_penalty: 1.0,
            early_stopping: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    sum_logprobs: f32,
}

/// Finished hypotheses, capped at the `num_beams` best.
struct FinishedPool {
    capacity: usize,
    hyps: Vec<(f32, Vec<u32>)>,
}

impl FinishedPool {
    fn new(capacity: usize) -> Self {
        Self { capacity, hyps: Vec::with_capacity(capacity + 1) }
    }

    fn offer(&mut self, score: f32, tokens: Vec<u32>) {
        self.hyps.push((score, tokens));
        self.hyps.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        self.hyps.truncate(self.capacity);
    }

    fn is_full(&self) -> bool {
        self.hyps.len() >= self.capacity
    }

    fn best(mut self) -> Option<Vec<u32>> {
        if self.hyps.is_empty() {
            return None;
        }
        Some(self.hyps.remove(0).1)
    }
}

fn finalized_score(sum_logprobs: f32, generated_len: usize, length_penalty: f32) -> f32 {
    sum_logprobs / (generated_len.max(1) as f32).powf(length_penalty)
}

/// Run beam search from `start_token` until `eos_token` or `max_length`.
/// Returns the best hypothesis' tokens with the start token stripped.
///
/// Fully deterministic: candidate ties are broken by token id.
pub fn beam_search<S>(
    mut score_fn: S,
    start_token: u32,
    eos_token: u32,
    params: &GenerationParams,
) -> Result<Vec<u32>>
where
    S: FnMut(&[u32]) -> Result<Vec<f32>>,
{
    let mut beams = vec![Hypothesis { tokens: vec![start_token], sum_logprobs: 0.0 }];
    let mut finished = FinishedPool::new(params.num_beams);
    let mut stopped_early = false;

    for _step in 0..params.max_length {
        // (candidate score, source beam, token)
        let mut candidates: Vec<(f32, usize, u32)> = Vec::new();

        for (beam_idx, beam) in beams.iter().enumerate() {
            let mut logprobs = score_fn(&beam.tokens)?;
            let generated = beam.tokens.len() - 1;
            if generated < params.min_length {
                if let Some(p) = logprobs.get_mut(eos_token as usize) {
                    *p = f32::NEG_INFINITY;
                }
            }
            for (token, lp) in top_k(&logprobs, 2 * params.num_beams) {
                candidates.push((beam.sum_logprobs + lp, beam_idx, token));
            }
        }

        candidates.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.2.cmp(&b.2))
        });
        candidates.truncate(2 * params.num_beams);

        let mut next_beams: Vec<Hypothesis> = Vec::with_capacity(params.num_beams);
        for (score, beam_idx, token) in candidates {
            if token == eos_token {
                // A masked (min-length) EOS carries -inf and never finalizes.
                if score.is_finite() {
                    let tokens = beams[beam_idx].tokens.clone();
                    let generated = tokens.len() - 1;
                    finished.offer(
                        finalized_score(score, generated, params.length_penalty),
                        tokens,
                    );
                }
            } else if next_beams.len() < params.num_beams {
                let mut tokens = beams[beam_idx].tokens.clone();
                tokens.push(token);
                next_beams.push(Hypothesis { tokens, sum_logprobs: score });
            }
            if next_beams.len() == params.num_beams {
                break;
            }
        }

        beams = next_beams;
        if params.early_stopping && finished.is_full() {
            stopped_early = true;
            break;
        }
        if beams.is_empty() {
            break;
        }
    }

    // Hypotheses still alive at max_length compete with their running score,
    // unless the search already stopped on finished hypotheses.
    if !stopped_early {
        for beam in &beams {
            let generated = beam.tokens.len() - 1;
            finished.offer(
                finalized_score(beam.sum_logprobs, generated, params.length_penalty),
                beam.tokens.clone(),
            );
        }
    }

    let mut best = finished
        .best()
        .unwrap_or_else(|| vec![start_token]);
    best.remove(0);
    Ok(best)
}

/// Indices of the `k` largest log-probs, ties broken by token id.
fn top_k(logprobs: &[f32], k: usize) -> Vec<(u32, f32)> {
    let mut indexed: Vec<(u32, f32)> = logprobs
        .iter()
        .enumerate()
        .map(|(i, &lp)| (i as u32, lp))
        .collect();
    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    indexed.truncate(k);
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;

    const EOS: u32 = 0;
    const START: u32 = 1;

    fn params(max: usize, min: usize, beams: usize, penalty: f32) -> GenerationParams {
        GenerationParams {
            max_length: max,
            min_length: min,
            num_beams: beams,
            length_penalty: penalty,
            early_stopping: true,
        }
    }

    /// Vocab of 4: EOS plus tokens 2 and 3. Token 2 is always preferred,
    /// EOS second, token 3 last.
    fn toy_scorer(_prefix: &[u32]) -> Result<Vec<f32>> {
        Ok(vec![-1.0, -10.0, -0.5, -3.0])
    }

    #[test]
    fn greedy_with_single_beam_follows_argmax() {
        let out = beam_search(toy_scorer, START, EOS, &params(3, 0, 1, 1.0)).unwrap();
        // Token 2 wins every step; EOS never becomes the single live beam.
        assert_eq!(out, vec![2, 2, 2]);
    }

    #[test]
    fn eos_preferred_scorer_finishes_immediately() {
        let scorer = |_prefix: &[u32]| Ok(vec![-0.1, -10.0, -5.0, -5.0]);
        let out = beam_search(scorer, START, EOS, &params(10, 0, 2, 1.0)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn min_length_masks_eos() {
        let scorer = |_prefix: &[u32]| Ok(vec![-0.1, -10.0, -5.0, -5.0]);
        let out = beam_search(scorer, START, EOS, &params(10, 3, 2, 1.0)).unwrap();
        assert!(out.len() >= 3);
    }

    #[test]
    fn max_length_caps_output() {
        let out = beam_search(toy_scorer, START, EOS, &params(5, 0, 4, 1.0)).unwrap();
        assert!(out.len() <= 5);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let p = params(8, 2, 4, 2.0);
        let a = beam_search(toy_scorer, START, EOS, &p).unwrap();
        let b = beam_search(toy_scorer, START, EOS, &p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn length_penalty_normalizes_by_generated_length() {
        // Same total log-prob, higher penalty favors the longer hypothesis.
        let short = finalized_score(-4.0, 2, 2.0);
        let long = finalized_score(-4.0, 4, 2.0);
        assert!(long > short);
        // Penalty 0 removes length normalization entirely.
        assert_eq!(finalized_score(-4.0, 2, 0.0), finalized_score(-4.0, 4, 0.0));
    }

    #[test]
    fn empty_generation_budget_yields_empty_output() {
        let out = beam_search(toy_scorer, START, EOS, &params(0, 0, 4, 1.0)).unwrap();
        assert!(out.is_empty());
    }
}
