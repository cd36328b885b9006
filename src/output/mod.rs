pub mod printer;
pub mod writer;
