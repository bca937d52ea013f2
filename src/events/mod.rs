pub mod sample;

pub use sample::SampleEvent;
