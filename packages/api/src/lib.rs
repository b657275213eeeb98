//! Record shapes for the Flatfile REST API.
//!
//! Every response payload is decoded through [`flatfile_core::Decode`] into
//! the types below; every request body serialises with `serde`. Records
//! also serialise, so a decoded value can be written back out and decoded
//! again unchanged.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `auth/access-token` | [`CreateTokenRequest`] → [`Data<TokenGrant>`] |
//! | GET | `users` | → [`Data<Vec<User>>`] |
//! | GET | `environments` | → [`Data<Vec<Environment>>`] |
//! | POST | `environments` | [`CreateEnvironmentRequest`] → [`Data<Environment>`] |
//! | GET | `spaces` | → [`Page<Space>`] |
//! | POST | `spaces` | [`CreateSpaceRequest`] → [`Data<Space>`] |
//! | GET | `workbooks?spaceId=…` | [`ListWorkbooksQuery`] → [`Data<Vec<Workbook>>`] |
//! | POST | `workbooks` | [`WorkbookInput`] → [`Data<Workbook>`] |
//! | GET | `environments/{id}/agents` | → [`Data<Vec<Agent>>`] |
//! | POST | `environments/{id}/agents` | [`AgentInput`] → [`Data<Agent>`] |
//! | GET | `environments/{id}/events` | → [`Data<Vec<Event>>`] |

pub mod agent;
pub mod envelope;
pub mod environment;
pub mod event;
pub mod sheet;
pub mod space;
pub mod token;
pub mod user;
pub mod workbook;

pub use agent::{Agent, AgentInput, Compiler};
pub use envelope::{Data, Page, Pagination};
pub use environment::{CreateEnvironmentRequest, Environment};
pub use event::{Event, EventAttributes, EventContext, EventDomain, Progress};
pub use sheet::{
    Constraint, ConstraintKind, EnumConfig, EnumField, EnumOption, Field, FieldBase,
    ReferenceConfig, ReferenceField, Relationship, Sheet, SheetConfig, SheetInput,
};
pub use space::{CreateSpaceRequest, SidebarConfig, Space};
pub use token::{CreateTokenRequest, TokenGrant};
pub use user::User;
pub use workbook::{ListWorkbooksQuery, Workbook, WorkbookInput};
