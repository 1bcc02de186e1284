pub mod driver;
pub mod observer;
pub mod pass_stats;
pub mod train_config;

pub use driver::{Phase, TrainingDriver};
pub use observer::{ConsoleObserver, TrainingObserver};
pub use pass_stats::{PassStats, TrainingReport};
pub use train_config::PerceptronConfig;
