//! Storage adapters: the repository and the question bank loader.

pub mod memory;
pub mod question_bank;

pub use memory::InMemoryRepository;
pub use question_bank::{QuestionBankError, load_question_bank, parse_question_bank};
