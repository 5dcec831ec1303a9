//! Search field processor framework.
//!
//! Computed fields are declared by resource descriptions and resolved by
//! named processors after the recursive conversion. Processors are looked up
//! in a registry built at startup.

mod call_number;
mod effective_call_number;
mod fields_processor;
mod processor;
mod typed_call_number;

pub use call_number::{normalize_shelving_order, shelving_order_embedding, CallNumberScheme};
pub use effective_call_number::{
    ItemEffectiveCallNumberProcessor, ITEM_EFFECTIVE_CALL_NUMBER_PROCESSOR,
};
pub use fields_processor::SearchFieldsProcessor;
pub use processor::{SearchFieldProcessor, SearchFieldProcessorRegistry};
pub use typed_call_number::{ItemTypedCallNumberProcessor, ITEM_TYPED_CALL_NUMBER_PROCESSOR};
