//! Report text parsing module.

mod classifier;
mod document;
mod options;
mod page;
mod title;

pub use classifier::{
    LineClassifier, NoReferenceRecognizer, NotDetectedRecognizer, RangedRecognizer,
    RatioRecognizer, Recognizer,
};
pub use document::{DocumentAggregator, DocumentExtraction};
pub use options::{ExtractOptions, Grammar, PageSelection};
pub use page::{PageExtraction, PageExtractor};
pub use title::TitleExtractor;
