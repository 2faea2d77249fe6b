pub mod ghosts;
pub mod items;
pub mod movement;
pub mod pacs;
