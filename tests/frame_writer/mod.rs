//! Integration tests for the connection-level frame writer

mod support;
