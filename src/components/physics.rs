use glam::Vec2;

/// The rigid body a controller pushes around.
///
/// Forces accumulate until the owner integrates the body; the controller never
/// integrates on its own. `drag` and `gravity_scale` are plain settings the
/// controller may swap temporarily (and must restore).
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn apply_force(&mut self, force: Vec2);
    fn drag(&self) -> f32;
    fn set_drag(&mut self, drag: f32);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);

    /// Whether the body can be driven at all. Checked once at controller setup.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Minimal 2D rigid body: point mass with a force accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Body2D {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mass in kilograms.
    pub mass: f32,
    /// Velocity damping. Applied as vel *= (1 - drag * dt) each step.
    pub drag: f32,
    pub gravity_scale: f32,
    /// Half size of the body's collision box.
    pub half_extents: Vec2,
    pending_force: Vec2,
}

impl Body2D {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 1.0,
            drag: 0.0,
            gravity_scale: 1.0,
            half_extents: Vec2::new(0.25, 0.7),
            pending_force: Vec2::ZERO,
        }
    }

    /// Force accumulated since the last [`integrate`](Self::integrate).
    pub fn pending_force(&self) -> Vec2 {
        self.pending_force
    }

    /// Semi-implicit Euler: velocity first, then position. Clears the force
    /// accumulator.
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        let accel = self.pending_force / self.mass + gravity * self.gravity_scale;
        self.velocity += accel * dt;
        let damping = (1.0 - self.drag * dt).max(0.0);
        self.velocity *= damping;
        self.position += self.velocity * dt;
        self.pending_force = Vec2::ZERO;
    }
}

impl PhysicsBody for Body2D {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_force(&mut self, force: Vec2) {
        self.pending_force += force;
    }

    fn drag(&self) -> f32 {
        self.drag
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn is_ready(&self) -> bool {
        self.mass > 0.0 && self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Axis-aligned box collider for level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, half_extents }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// Marker: entity is immovable level geometry.
pub struct Static;

/// Marker: geometry the character can stand on or cling to. Static geometry
/// without it still blocks the body but is invisible to the probes.
pub struct Environment;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn force_is_consumed_by_one_integration() {
        let mut body = Body2D::new(Vec2::ZERO);
        body.apply_force(Vec2::new(10.0, 0.0));
        body.apply_force(Vec2::new(5.0, 0.0));
        body.integrate(Vec2::ZERO, 0.1);
        assert_relative_eq!(body.velocity.x, 1.5);
        assert_eq!(body.pending_force(), Vec2::ZERO);

        body.integrate(Vec2::ZERO, 0.1);
        assert_relative_eq!(body.velocity.x, 1.5);
    }

    #[test]
    fn gravity_respects_scale() {
        let mut body = Body2D::new(Vec2::ZERO);
        body.gravity_scale = 0.5;
        body.integrate(Vec2::new(0.0, -10.0), 0.1);
        assert_relative_eq!(body.velocity.y, -0.5);
    }

    #[test]
    fn drag_slows_the_body() {
        let mut body = Body2D::new(Vec2::ZERO);
        body.velocity = Vec2::new(4.0, 0.0);
        body.drag = 5.0;
        body.integrate(Vec2::ZERO, 0.1);
        assert_relative_eq!(body.velocity.x, 2.0);
    }

    #[test]
    fn massless_body_is_not_ready() {
        let mut body = Body2D::new(Vec2::ZERO);
        assert!(body.is_ready());
        body.mass = 0.0;
        assert!(!body.is_ready());
    }
}
