//! Entity managers
//!
//! Typed views over cache collections. Each manager is built on demand from
//! a [`Client`](crate::Client) and holds no entities of its own.

mod base;
mod channels;
mod child;
mod guilds;
mod member_roles;
mod roles;

pub use base::{BaseManager, Manager};
pub use channels::{ChannelTarget, ChannelsManager, USER_DMS_COLLECTION};
pub use child::{ChildManager, Membership, Relationship};
pub use guilds::{GuildsManager, UsersManager};
pub use member_roles::{MemberRoleRelationship, MemberRolesManager};
pub use roles::{MembersManager, RolesManager};
