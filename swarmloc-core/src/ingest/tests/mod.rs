mod line_reader_tests;
mod parse_tests;
