use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::models::Word;
use crate::utils::{normalize_answer, normalize_text, WRONG_MARK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub wrong: bool,
}

impl Candidate {
    pub fn label(&self) -> String {
        if self.wrong {
            format!("{}{}", self.text, WRONG_MARK)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Wrong,
}

/// One card: the target word and the candidates offered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub target: Word,
    pub candidates: Vec<Candidate>,
}

impl QuizRound {
    /// The first drawn word becomes the target, every drawn word a candidate.
    /// Returns `None` for an empty draw.
    pub fn from_draw<R: Rng + ?Sized>(words: Vec<Word>, rng: &mut R) -> Option<Self> {
        let target = words.first()?.clone();
        let mut candidates: Vec<Candidate> = words
            .into_iter()
            .map(|word| Candidate {
                text: normalize_text(&word.source_text),
                wrong: false,
            })
            .collect();
        candidates.shuffle(rng);

        Some(QuizRound { target, candidates })
    }

    pub fn answer(&mut self, text: &str) -> Answer {
        let text = normalize_answer(text);
        if text == normalize_text(&self.target.source_text) {
            return Answer::Correct;
        }

        if let Some(candidate) = self.candidates.iter_mut().find(|c| c.text == text) {
            candidate.wrong = true;
        }
        Answer::Wrong
    }

    pub fn labels(&self) -> Vec<String> {
        self.candidates.iter().map(Candidate::label).collect()
    }
}
