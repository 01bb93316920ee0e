//! Entity manager abstraction
//!
//! An [`EntityManager`] is the storage side of a CRUD resource. The HTTP
//! handlers in [`crate::handlers`] decode requests, call the manager and
//! render whatever it returns; everything about persistence lives here.

mod context;
mod error;
mod modifiers;
mod patch;
mod traits;

pub use context::{RawPayload, RequestContext};
pub use error::{ManagerError, ManagerErrorKind, ManagerOperation, ManagerResult};
pub use modifiers::ListModifiers;
pub use patch::{merge_patch, PartialUpdateData};
pub use traits::{EntityManager, DEFAULT_ID_PREFIX};

pub use crate::ids::EntityId;
