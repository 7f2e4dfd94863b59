pub mod callback_reader;
pub mod transaction_writer;
