mod translate;

pub use translate::Translate;
