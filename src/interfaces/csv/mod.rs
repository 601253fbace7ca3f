pub mod profile_writer;
pub mod request_reader;
