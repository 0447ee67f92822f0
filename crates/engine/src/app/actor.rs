use super::collision::{self, CollisionReport};
use super::geometry::{Rect, Vec2};
use super::input::{InputAction, InputSnapshot};
use super::nav::{Route, TileId};
use super::room::Room;

pub const PLAYER_SIZE: f32 = 30.0;
pub const PLAYER_ACCELERATION: f32 = 0.1;
pub const PLAYER_DECELERATION: f32 = 0.92;
pub const PLAYER_MAX_SPEED: f32 = 1.0;
pub const ENEMY_SIZE: f32 = 80.0;
pub const ENEMY_SPEED: f32 = 2.0;
pub const ENEMY_WAYPOINT_THRESHOLD_SQ: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub acceleration: f32,
    /// Per-tick velocity multiplier, in (0, 1).
    pub deceleration: f32,
    pub max_speed: f32,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            acceleration: PLAYER_ACCELERATION,
            deceleration: PLAYER_DECELERATION,
            max_speed: PLAYER_MAX_SPEED,
        }
    }
}

/// Rescales `velocity` onto the `max_speed` circle when it is at or beyond it.
/// The zero vector is returned as is.
pub fn clamp_velocity(velocity: Vec2, max_speed: f32) -> Vec2 {
    if velocity.is_zero() {
        return velocity;
    }
    let magnitude = velocity.length();
    if magnitude < max_speed {
        return velocity;
    }
    let scale = max_speed / magnitude;
    Vec2 {
        x: velocity.x * scale,
        y: velocity.y * scale,
    }
}

/// Position, velocity and the box derived from them.
///
/// `position` is the center of the box and the authoritative state;
/// `bounding_box` is refreshed by [`Body::sync_bounding_box`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    size: Vec2,
    bounding_box: Rect,
}

impl Body {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size: Vec2 {
                x: width,
                y: height,
            },
            bounding_box: Rect::centered(position, width, height),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn sync_bounding_box(&mut self) {
        self.bounding_box = Rect::centered(self.position, self.size.x, self.size.y);
    }

    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.sync_bounding_box();
    }

    fn integrate(&mut self) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.sync_bounding_box();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorView {
    pub kind: ActorKind,
    pub position: Vec2,
    pub bounding_box: Rect,
    pub route_len: usize,
}

pub trait Actor {
    fn kind(&self) -> ActorKind;
    fn body(&self) -> &Body;

    fn view(&self) -> ActorView {
        let body = self.body();
        ActorView {
            kind: self.kind(),
            position: body.position,
            bounding_box: body.bounding_box(),
            route_len: 0,
        }
    }
}

/// Input-driven actor with momentum and wall collision.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: Body,
    kinematics: Kinematics,
}

impl Player {
    pub fn new(position: Vec2, kinematics: Kinematics) -> Self {
        Self {
            body: Body::new(position, PLAYER_SIZE, PLAYER_SIZE),
            kinematics,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    pub fn tick<'a>(
        &mut self,
        input: &InputSnapshot,
        walls: impl IntoIterator<Item = &'a Rect>,
    ) -> CollisionReport {
        self.accelerate(input);
        self.body.velocity = clamp_velocity(self.body.velocity, self.kinematics.max_speed);
        self.body.integrate();
        let report = collision::resolve(
            &mut self.body.position,
            &mut self.body.bounding_box,
            walls,
        );
        self.decelerate();
        report
    }

    fn accelerate(&mut self, input: &InputSnapshot) {
        let acceleration = self.kinematics.acceleration;
        let velocity = &mut self.body.velocity;
        if input.is_down(InputAction::MoveRight) {
            velocity.x += acceleration;
        }
        if input.is_down(InputAction::MoveLeft) {
            velocity.x -= acceleration;
        }
        if input.is_down(InputAction::MoveUp) {
            velocity.y -= acceleration;
        }
        if input.is_down(InputAction::MoveDown) {
            velocity.y += acceleration;
        }
    }

    fn decelerate(&mut self) {
        self.body.velocity.x *= self.kinematics.deceleration;
        self.body.velocity.y *= self.kinematics.deceleration;
    }
}

impl Actor for Player {
    fn kind(&self) -> ActorKind {
        ActorKind::Player
    }

    fn body(&self) -> &Body {
        &self.body
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyStep {
    Idle,
    Moving { toward: TileId },
    Reached { waypoint: TileId, remaining: usize },
}

/// Route-following actor. Walls are not consulted; the route is trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    body: Body,
    speed: f32,
    waypoint_threshold_sq: f32,
    route: Option<Route>,
}

impl Enemy {
    pub fn new(position: Vec2, speed: f32, waypoint_threshold_sq: f32) -> Self {
        Self {
            body: Body::new(position, ENEMY_SIZE, ENEMY_SIZE),
            speed,
            waypoint_threshold_sq,
            route: None,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn set_route(&mut self, route: Route) {
        self.route = (!route.is_empty()).then_some(route);
    }

    pub fn clear_route(&mut self) {
        self.route = None;
        self.body.velocity = Vec2::ZERO;
    }

    pub fn is_idle(&self) -> bool {
        self.route.is_none()
    }

    pub fn tick(&mut self, room: &Room) -> EnemyStep {
        let Some(waypoint) = self.route.as_ref().and_then(Route::next) else {
            self.clear_route();
            return EnemyStep::Idle;
        };
        let Some(target) = room.tile_position(waypoint) else {
            self.clear_route();
            return EnemyStep::Idle;
        };

        let heading = Vec2 {
            x: target.x - self.body.position.x,
            y: target.y - self.body.position.y,
        };
        let distance = heading.length();
        let arrived = if self.speed >= distance {
            // A step that would carry past the waypoint lands on it instead.
            self.body.velocity = heading;
            self.body.position = target;
            self.body.sync_bounding_box();
            true
        } else {
            let scale = self.speed / distance;
            self.body.velocity = Vec2 {
                x: heading.x * scale,
                y: heading.y * scale,
            };
            self.body.integrate();
            self.body.position.distance_squared(target) < self.waypoint_threshold_sq
        };

        if !arrived {
            return EnemyStep::Moving { toward: waypoint };
        }

        let remaining = match self.route.as_mut() {
            Some(route) => {
                route.pop_next();
                route.len()
            }
            None => 0,
        };
        if remaining == 0 {
            self.clear_route();
        }
        EnemyStep::Reached {
            waypoint,
            remaining,
        }
    }
}

impl Actor for Enemy {
    fn kind(&self) -> ActorKind {
        ActorKind::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn view(&self) -> ActorView {
        ActorView {
            kind: ActorKind::Enemy,
            position: self.body.position,
            bounding_box: self.body.bounding_box(),
            route_len: self.route.as_ref().map_or(0, Route::len),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnemyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorHandle {
    Player,
    Enemy(EnemyId),
}

/// The controlled player plus enemies in registration order.
#[derive(Debug, Clone)]
pub struct ActorSet {
    player: Player,
    enemies: Vec<Enemy>,
}

impl ActorSet {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Vec::new(),
        }
    }

    pub fn add_enemy(&mut self, enemy: Enemy) -> EnemyId {
        self.enemies.push(enemy);
        EnemyId(self.enemies.len() - 1)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id.0)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(id.0)
    }

    pub fn body(&self, handle: ActorHandle) -> Option<&Body> {
        match handle {
            ActorHandle::Player => Some(self.player.body()),
            ActorHandle::Enemy(id) => self.enemy(id).map(Actor::body),
        }
    }

    pub fn views(&self) -> Vec<ActorView> {
        std::iter::once(self.player.view())
            .chain(self.enemies.iter().map(Actor::view))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::nav::{TileGraph, WALKABLE_TILE_CODE};
    use crate::app::room::{PathingGrid, RoomId};

    fn open_room() -> Room {
        let graph = TileGraph::from_codes(&[WALKABLE_TILE_CODE; 16], 4).expect("graph");
        let grid = PathingGrid {
            origin: Vec2::ZERO,
            tile_size: 50.0,
        };
        Room::new(RoomId::new("open"), "Open", "open.png", graph, grid)
    }

    #[test]
    fn clamp_never_exceeds_max_speed() {
        let max_speed = 1.5;
        for step in 0..64 {
            let angle = step as f32 * 0.1;
            for magnitude in [0.1, 1.0, 1.5, 3.0, 250.0] {
                let velocity = Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude);
                let clamped = clamp_velocity(velocity, max_speed);
                assert!(clamped.length() <= max_speed + 1e-4);
            }
        }
    }

    #[test]
    fn clamp_keeps_zero_vector_and_slow_vectors() {
        assert_eq!(clamp_velocity(Vec2::ZERO, 1.0), Vec2::ZERO);
        assert_eq!(clamp_velocity(Vec2::ZERO, 0.0), Vec2::ZERO);
        let slow = Vec2::new(0.3, -0.4);
        assert_eq!(clamp_velocity(slow, 1.0), slow);
    }

    #[test]
    fn clamp_preserves_direction() {
        let clamped = clamp_velocity(Vec2::new(3.0, 4.0), 1.0);
        assert!((clamped.x - 0.6).abs() < 1e-6);
        assert!((clamped.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn player_accelerates_moves_and_decays() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), Kinematics::default());
        let input = InputSnapshot::from_actions(&[InputAction::MoveRight]);
        player.tick(&input, std::iter::empty());

        let body = player.body();
        assert!((body.position.x - 100.1).abs() < 1e-4);
        assert_eq!(body.position.y, 100.0);
        assert!((body.velocity.x - 0.1 * PLAYER_DECELERATION).abs() < 1e-6);
        assert_eq!(body.bounding_box(), Rect::centered(body.position, 30.0, 30.0));
    }

    #[test]
    fn player_speed_is_bounded_while_holding_input() {
        let mut player = Player::new(Vec2::ZERO, Kinematics::default());
        let input = InputSnapshot::from_actions(&[InputAction::MoveDown, InputAction::MoveLeft]);
        let mut previous = player.body().position;
        for _ in 0..500 {
            player.tick(&input, std::iter::empty());
            let position = player.body().position;
            let step = Vec2::new(position.x - previous.x, position.y - previous.y);
            assert!(step.length() <= PLAYER_MAX_SPEED + 1e-4);
            previous = position;
        }
        assert!(player.body().position.x < 0.0);
        assert!(player.body().position.y > 0.0);
    }

    #[test]
    fn player_velocity_decays_without_input() {
        let mut player = Player::new(Vec2::ZERO, Kinematics::default());
        player.body_mut().velocity = Vec2::new(1.0, 0.0);
        for _ in 0..200 {
            player.tick(&InputSnapshot::empty(), std::iter::empty());
        }
        assert!(player.body().velocity.x.abs() < 1e-6);
    }

    #[test]
    fn player_is_stopped_by_wall() {
        let wall = Rect::new(120.0, 0.0, 100.0, 300.0);
        let mut player = Player::new(Vec2::new(100.0, 150.0), Kinematics::default());
        let input = InputSnapshot::from_actions(&[InputAction::MoveRight]);
        for _ in 0..200 {
            player.tick(&input, [&wall]);
            assert!(player.body().position.x <= 120.0 - PLAYER_SIZE / 2.0 + 1.0);
        }
    }

    #[test]
    fn enemy_walks_route_and_goes_idle() {
        let room = open_room();
        let mut enemy = Enemy::new(Vec2::ZERO, ENEMY_SPEED, ENEMY_WAYPOINT_THRESHOLD_SQ);
        assert_eq!(enemy.tick(&room), EnemyStep::Idle);

        let route: Route = [TileId(1), TileId(5)].into_iter().collect();
        enemy.set_route(route);
        assert_eq!(enemy.view().route_len, 2);

        let mut reached = Vec::new();
        for _ in 0..200 {
            if let EnemyStep::Reached { waypoint, .. } = enemy.tick(&room) {
                reached.push(waypoint);
            }
            if enemy.is_idle() {
                break;
            }
        }
        assert_eq!(reached, vec![TileId(1), TileId(5)]);
        let goal = room.tile_position(TileId(5)).expect("goal");
        assert!(enemy.body().position.distance_squared(goal) < ENEMY_WAYPOINT_THRESHOLD_SQ);
        assert_eq!(enemy.body().velocity, Vec2::ZERO);
    }

    #[test]
    fn enemy_moves_at_fixed_speed_toward_waypoint() {
        let room = open_room();
        let mut enemy = Enemy::new(Vec2::ZERO, ENEMY_SPEED, ENEMY_WAYPOINT_THRESHOLD_SQ);
        enemy.set_route([TileId(2)].into_iter().collect());
        assert_eq!(enemy.tick(&room), EnemyStep::Moving { toward: TileId(2) });
        assert!((enemy.body().velocity.length() - ENEMY_SPEED).abs() < 1e-5);
        assert!((enemy.body().position.x - ENEMY_SPEED).abs() < 1e-5);
    }

    #[test]
    fn fast_enemy_lands_on_waypoint_instead_of_overshooting() {
        let room = open_room();
        let mut enemy = Enemy::new(Vec2::new(45.0, 0.0), 10.0, ENEMY_WAYPOINT_THRESHOLD_SQ);
        enemy.set_route([TileId(1)].into_iter().collect());

        assert_eq!(
            enemy.tick(&room),
            EnemyStep::Reached {
                waypoint: TileId(1),
                remaining: 0
            }
        );
        assert!(enemy.is_idle());
        assert_eq!(enemy.body().position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn fast_enemy_consumes_long_route() {
        let room = open_room();
        let mut enemy = Enemy::new(Vec2::new(3.0, 0.0), 35.0, 1.0);
        enemy.set_route([TileId(1), TileId(2), TileId(6), TileId(11)].into_iter().collect());

        let mut ticks = 0;
        while !enemy.is_idle() && ticks < 100 {
            enemy.tick(&room);
            ticks += 1;
        }
        assert!(enemy.is_idle(), "route was not consumed");
        let goal = room.tile_position(TileId(11)).expect("goal");
        assert_eq!(enemy.body().position, goal);
    }

    #[test]
    fn zero_threshold_still_arrives_by_landing() {
        let room = open_room();
        let mut enemy = Enemy::new(Vec2::new(48.0, 0.0), ENEMY_SPEED, 0.0);
        enemy.set_route([TileId(1)].into_iter().collect());
        assert!(matches!(enemy.tick(&room), EnemyStep::Reached { .. }));
    }

    #[test]
    fn empty_route_leaves_enemy_idle() {
        let mut enemy = Enemy::new(Vec2::ZERO, ENEMY_SPEED, ENEMY_WAYPOINT_THRESHOLD_SQ);
        enemy.set_route(Route::new());
        assert!(enemy.is_idle());
    }

    #[test]
    fn actor_set_exposes_typed_roles() {
        let mut actors = ActorSet::new(Player::new(Vec2::ZERO, Kinematics::default()));
        let first = actors.add_enemy(Enemy::new(Vec2::new(5.0, 5.0), 1.0, 1.0));
        let second = actors.add_enemy(Enemy::new(Vec2::new(9.0, 9.0), 1.0, 1.0));
        assert_eq!((first, second), (EnemyId(0), EnemyId(1)));
        assert_eq!(actors.player().kind(), ActorKind::Player);
        assert_eq!(actors.enemies().len(), 2);
        assert_eq!(
            actors.body(ActorHandle::Enemy(second)).expect("body").position,
            Vec2::new(9.0, 9.0)
        );
        assert!(actors.body(ActorHandle::Enemy(EnemyId(7))).is_none());

        let kinds: Vec<ActorKind> = actors.views().iter().map(|view| view.kind).collect();
        assert_eq!(kinds, vec![ActorKind::Player, ActorKind::Enemy, ActorKind::Enemy]);
    }
}
