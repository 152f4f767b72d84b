pub mod memory;

pub use memory::InMemoryPatternRepository;
