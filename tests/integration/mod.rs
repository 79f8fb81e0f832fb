//! Integration tests for the releaser

mod test_bump;
mod test_cli;
mod test_git;
