use crate::input::InputManager;
use crate::rendering::{RenderConfig, Renderer};
use crate::session::Session;
use log::info;
use macroquad::prelude::*;
use shared::{Arena, World, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Settings for one player process.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub player_id: String,
    pub relay_addr: String,
    pub dummies: bool,
    pub render: RenderConfig,
}

impl ClientConfig {
    pub fn new(player_id: &str, relay_addr: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            relay_addr: relay_addr.to_string(),
            dummies: false,
            render: RenderConfig::default(),
        }
    }

    /// Initial world on the standard map, with target dummies if requested.
    pub fn world(&self) -> World {
        let mut world = World::new(&self.player_id, Arena::standard());
        if self.dummies {
            world.seed_dummies();
        }
        world
    }
}

pub fn window_conf() -> Conf {
    Conf {
        window_title: "Arena".to_owned(),
        window_width: SCREEN_WIDTH as i32,
        window_height: SCREEN_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// Frame loop: sample input, tick, draw. Escape quits.
pub async fn run(session: Session, config: ClientConfig) {
    let mut input_manager = InputManager::new();
    let mut renderer = Renderer::new(config.render);
    let mut rng = ::rand::thread_rng();

    info!("Playing as {}", config.player_id);
    info!("Controls: WASD to move, Shift to sprint, left mouse to fire");
    info!("Press R/H to toggle rays/hitboxes, Escape to quit");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("Leaving the arena");
            break;
        }

        let (toggles, input) = input_manager.sample();
        if toggles.rays {
            renderer.toggle_rays();
        }
        if toggles.hitboxes {
            renderer.toggle_hitboxes();
        }

        session.tick(&input, get_time(), &mut rng);

        let frame = session.snapshot();
        renderer.render(&frame);

        next_frame().await;
    }
}
