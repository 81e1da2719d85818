use wasm_bindgen::prelude::*;

pub mod backdrop;
pub mod config;
pub mod contact;
pub mod decor;
pub mod game;
pub mod lanes;
pub mod obstacle;
pub mod player;
pub mod scene;
pub mod session;
pub mod spawner;
pub mod sprites;
pub mod state;

use game::ReefDash;

reef_web::export_game!(ReefDash, "reef-dash");
