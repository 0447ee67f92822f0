use super::geometry::{Rect, Vec2};

/// Which of the actor's edges sit inside a wall. Any combination may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn count(&self) -> usize {
        [self.up, self.down, self.left, self.right]
            .into_iter()
            .filter(|flag| *flag)
            .count()
    }
}

pub fn collision_directions(actor: &Rect, wall: &Rect) -> CollisionDirections {
    CollisionDirections {
        up: actor.collides_up(wall),
        down: actor.collides_down(wall),
        left: actor.collides_left(wall),
        right: actor.collides_right(wall),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub walls_hit: usize,
    pub pushes: usize,
}

/// Pushes an actor centered on `position` out of every wall it overlaps.
///
/// Overlap and directions are all measured against `bounding_box` as it was
/// on entry. Every flagged direction of every colliding wall is applied, in
/// wall order, each one snapping the position flush to that wall edge; later
/// snaps simply overwrite earlier ones on the same axis. `bounding_box` is
/// rebuilt from the final position.
pub fn resolve<'a>(
    position: &mut Vec2,
    bounding_box: &mut Rect,
    walls: impl IntoIterator<Item = &'a Rect>,
) -> CollisionReport {
    let actor = *bounding_box;
    let half_w = actor.w / 2.0;
    let half_h = actor.h / 2.0;
    let mut report = CollisionReport::default();

    for wall in walls.into_iter().filter(|wall| wall.collides(&actor)) {
        report.walls_hit += 1;
        let directions = collision_directions(&actor, wall);
        report.pushes += directions.count();
        if directions.up {
            position.y = wall.bottom() + half_h;
        }
        if directions.down {
            position.y = wall.y - half_h;
        }
        if directions.left {
            position.x = wall.right() + half_w;
        }
        if directions.right {
            position.x = wall.x - half_w;
        }
    }

    if report.walls_hit > 0 {
        *bounding_box = Rect::centered(*position, actor.w, actor.h);
    }
    report
}
