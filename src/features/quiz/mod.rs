pub mod round;

pub use round::{Answer, Candidate, QuizRound};
