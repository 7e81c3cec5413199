pub mod summary_processor;
