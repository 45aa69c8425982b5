mod parsing_test;
mod reader_test;
mod resolver_test;
