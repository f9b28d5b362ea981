/// Built-in refinement backends.
pub mod command;
