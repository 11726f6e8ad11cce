pub mod issue;
pub mod iteration;
pub mod project;
pub mod sync;
