//! The singleton user profile: its storage, the profile page and the
//! endpoints for changing the name and avatar.

mod avatar;
mod core;
mod profile_endpoint;
mod profile_page;

pub use avatar::{get_avatar, upload_avatar_endpoint};
pub use core::{
    Avatar, User, create_user_table, ensure_default_user, get_user, get_user_avatar,
    update_user_avatar, update_user_name,
};
pub use profile_endpoint::update_profile_endpoint;
pub use profile_page::{ProfileState, get_profile_page};

#[cfg(test)]
pub use core::DEFAULT_USER_NAME;
