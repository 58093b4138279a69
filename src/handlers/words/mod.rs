pub mod words;

pub use words::words_router;
