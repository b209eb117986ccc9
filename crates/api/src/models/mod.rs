//! Domain models, request/response types, and request validation.

pub mod product;
pub mod store;
pub mod validation;

pub use product::{
    NewProduct, Product, ProductFilter, ProductPage, ProductPatch, ProductWithStore,
    ProductWithStoreRef, StoreRef,
};
pub use store::{NewStore, Store, StorePatch, StoreSummary, StoreWithProducts};
pub use validation::FieldErrors;
