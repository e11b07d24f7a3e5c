mod cart;
mod menu;
mod token;
mod user;

pub use cart::{Cart, CartItem, ItemDelta, ItemRequest};
pub use menu::{Menu, MenuEntry};
pub use token::Token;
pub use user::{NewUser, User, UserProfile, UserUpdate};
