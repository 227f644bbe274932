use macroquad::prelude::*;
use shared::{Player, Projectile, Segment, World, PLAYER_RADIUS};

const BACKGROUND: Color = Color::new(0.1, 0.1, 0.1, 1.0);
const LIT_FLOOR: Color = Color::new(0.27, 0.27, 0.27, 1.0);
const REMOTE: Color = Color::new(1.0, 0.27, 0.27, 1.0);
const DOWNED: Color = Color::new(0.5, 0.5, 0.5, 1.0);

/// Which debug overlays are drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub show_rays: bool,
    pub show_hitboxes: bool,
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Renderer { config }
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub fn toggle_rays(&mut self) {
        self.config.show_rays = !self.config.show_rays;
    }

    pub fn toggle_hitboxes(&mut self) {
        self.config.show_hitboxes = !self.config.show_hitboxes;
    }

    /// Draws one frame from a world snapshot. Remote players outside the
    /// lit area are not drawn.
    pub fn render(&mut self, world: &World) {
        clear_background(BACKGROUND);

        self.draw_light(world);
        self.draw_occluders(world);

        for player in visible_remotes(world) {
            self.draw_player(player, false);
        }
        self.draw_player(&world.local, true);

        self.draw_projectiles(world.local.projectiles.iter());
        self.draw_projectiles(visible_projectiles(world).into_iter());

        self.draw_aim(&world.local);
        self.draw_ui(world);
    }

    fn draw_light(&mut self, world: &World) {
        let visibility = world.visibility();
        for [a, b, c] in visibility.triangles() {
            draw_triangle(to_vec2(a.x, a.y), to_vec2(b.x, b.y), to_vec2(c.x, c.y), LIT_FLOOR);
        }

        if self.config.show_rays {
            for ray in visibility.rays() {
                draw_segment(ray, 1.0, YELLOW);
            }
        }
    }

    fn draw_occluders(&mut self, world: &World) {
        for boundary in world.arena().occluders() {
            for segment in boundary.segments() {
                draw_segment(segment, 2.0, WHITE);
            }
        }
    }

    fn draw_player(&mut self, player: &Player, is_local: bool) {
        let color = player_color(player, is_local);
        draw_circle(player.x as f32, player.y as f32, PLAYER_RADIUS as f32, color);

        if is_local || self.config.show_hitboxes {
            for segment in player.hitbox().segments() {
                draw_segment(segment, 1.0, SKYBLUE);
            }
        }

        draw_text(
            &player.id,
            (player.x - PLAYER_RADIUS) as f32,
            (player.y - PLAYER_RADIUS - 4.0) as f32,
            16.0,
            WHITE,
        );
    }

    fn draw_projectiles<'a>(&mut self, projectiles: impl Iterator<Item = &'a Projectile>) {
        for projectile in projectiles {
            draw_segment(&projectile.path(), 2.0, ORANGE);
        }
    }

    fn draw_aim(&mut self, player: &Player) {
        if player.is_downed() {
            return;
        }
        let length = 40.0;
        let end_x = player.x + player.angle.cos() * length;
        let end_y = player.y + player.angle.sin() * length;
        draw_line(
            player.x as f32,
            player.y as f32,
            end_x as f32,
            end_y as f32,
            1.0,
            RED,
        );
    }

    fn draw_ui(&mut self, world: &World) {
        let health = format!("HP {}", world.local.health.max(0));
        draw_text(&health, 10.0, 24.0, 24.0, WHITE);

        let fps = format!("{} fps", get_fps());
        draw_text(&fps, 10.0, 48.0, 16.0, GRAY);

        let peers = format!("{} peers", world.remotes.len());
        draw_text(&peers, 10.0, 66.0, 16.0, GRAY);

        if world.local.is_downed() {
            draw_text(
                "DOWN",
                screen_width() / 2.0 - 60.0,
                screen_height() / 2.0,
                64.0,
                RED,
            );
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Remote players standing inside the local player's visibility polygon.
pub fn visible_remotes(world: &World) -> Vec<&Player> {
    let visibility = world.visibility();
    world
        .remotes
        .values()
        .filter(|player| visibility.contains(player.position()))
        .collect()
}

/// Remote projectiles whose current position is lit.
pub fn visible_projectiles(world: &World) -> Vec<&Projectile> {
    let visibility = world.visibility();
    world
        .remotes
        .values()
        .flat_map(|player| player.projectiles.iter())
        .filter(|projectile| visibility.contains(projectile.position()))
        .collect()
}

pub fn player_color(player: &Player, is_local: bool) -> Color {
    if player.is_downed() {
        DOWNED
    } else if is_local {
        GREEN
    } else {
        REMOTE
    }
}

fn to_vec2(x: f64, y: f64) -> Vec2 {
    vec2(x as f32, y as f32)
}

fn draw_segment(segment: &Segment, thickness: f32, color: Color) {
    draw_line(
        segment.p1.x as f32,
        segment.p1.y as f32,
        segment.p2.x as f32,
        segment.p2.y as f32,
        thickness,
        color,
    );
}
