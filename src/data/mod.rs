//! Data structures for expression and promoter feature tables

mod experiments;
mod expression;
mod records;

pub use experiments::{CollectionTime, DroughtArm, Experiment, ExperimentSelection, Tissue};
pub use expression::ExpressionMatrix;
pub use records::{motif_markers, GeneKeyed, MotifAssociation, MotifMarker, MotifSite, PromoterLength};
