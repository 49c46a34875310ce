//! Circle–circle collision response with a mass-weighted impulse.

use glam::Vec2;

/// Centre distances below this are treated as coincident (no usable normal).
const MIN_SEPARATION: f32 = 1e-6;

/// A rigid circular body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32, radius: f32) -> Self {
        Self { pos, vel, mass, radius }
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// Result of resolving one overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body to the second.
    pub normal: Vec2,
    /// Interpenetration depth that was removed.
    pub depth: f32,
    /// Impulse magnitude applied; 0 when the pair was already separating.
    pub impulse: f32,
}

/// Resolve a possible contact between `a` and `b`.
///
/// Overlapping bodies are pushed apart along the normal, each by the share
/// of the overlap proportional to the *other* body's mass. An impulse
/// `j = -(1 + e)(v_rel · n) / (1/m_a + 1/m_b)` is applied only while the
/// bodies approach. Coincident centres or non-positive masses yield `None`.
pub fn resolve_pair(a: &mut Circle, b: &mut Circle, restitution: f32) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let reach = a.radius + b.radius;

    if dist >= reach || dist < MIN_SEPARATION {
        return None;
    }
    if a.mass <= 0.0 || b.mass <= 0.0 {
        return None;
    }

    let normal = delta / dist;
    let depth = reach - dist;
    let total = a.mass + b.mass;
    a.pos -= normal * (depth * b.mass / total);
    b.pos += normal * (depth * a.mass / total);

    let approach = (b.vel - a.vel).dot(normal);
    if approach >= 0.0 {
        return Some(Contact { normal, depth, impulse: 0.0 });
    }

    let e = restitution.clamp(0.0, 1.0);
    let j = -(1.0 + e) * approach / (1.0 / a.mass + 1.0 / b.mass);
    a.vel -= normal * (j / a.mass);
    b.vel += normal * (j / b.mass);

    Some(Contact { normal, depth, impulse: j })
}

/// Resolve every unordered pair once. Returns the number of impulses applied.
pub fn resolve_all(bodies: &mut [Circle], restitution: f32) -> usize {
    let mut impulses = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if let Some(contact) = resolve_pair(a, b, restitution) {
                if contact.impulse > 0.0 {
                    impulses += 1;
                }
            }
        }
    }
    impulses
}

pub fn total_momentum(bodies: &[Circle]) -> Vec2 {
    bodies.iter().map(Circle::momentum).sum()
}

pub fn total_kinetic_energy(bodies: &[Circle]) -> f32 {
    bodies.iter().map(Circle::kinetic_energy).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approaching_pair() -> (Circle, Circle) {
        (
            Circle::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 1.0), 2.0, 10.0),
            Circle::new(Vec2::new(18.0, 4.0), Vec2::new(-1.0, -0.5), 5.0, 10.0),
        )
    }

    #[test]
    fn elastic_collision_conserves_momentum_and_energy() {
        let (mut a, mut b) = approaching_pair();
        let p0 = a.momentum() + b.momentum();
        let e0 = a.kinetic_energy() + b.kinetic_energy();

        let contact = resolve_pair(&mut a, &mut b, 1.0).unwrap();
        assert!(contact.impulse > 0.0);

        let p1 = a.momentum() + b.momentum();
        let e1 = a.kinetic_energy() + b.kinetic_energy();
        assert!((p1 - p0).length() < 1e-4, "momentum {:?} -> {:?}", p0, p1);
        assert!((e1 - e0).abs() < 1e-3, "energy {} -> {}", e0, e1);
    }

    #[test]
    fn heavier_body_moves_less() {
        let (mut a, mut b) = approaching_pair();
        let (a0, b0) = (a.pos, b.pos);
        resolve_pair(&mut a, &mut b, 1.0);
        let moved_a = (a.pos - a0).length();
        let moved_b = (b.pos - b0).length();
        assert!(moved_b < moved_a);
        assert!((a.pos.distance(b.pos) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn separating_pair_gets_no_impulse() {
        let mut a = Circle::new(Vec2::ZERO, Vec2::new(-1.0, 0.0), 1.0, 10.0);
        let mut b = Circle::new(Vec2::new(15.0, 0.0), Vec2::new(1.0, 0.0), 1.0, 10.0);
        let contact = resolve_pair(&mut a, &mut b, 1.0).unwrap();
        assert_eq!(contact.impulse, 0.0);
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn coincident_centres_are_ignored() {
        let mut a = Circle::new(Vec2::ONE, Vec2::X, 1.0, 5.0);
        let mut b = Circle::new(Vec2::ONE, -Vec2::X, 1.0, 5.0);
        assert!(resolve_pair(&mut a, &mut b, 1.0).is_none());
        assert!(a.pos.is_finite() && a.vel.is_finite());
        assert!(b.pos.is_finite() && b.vel.is_finite());
    }

    #[test]
    fn no_contact_when_apart() {
        let mut a = Circle::new(Vec2::ZERO, Vec2::X, 1.0, 5.0);
        let mut b = Circle::new(Vec2::new(30.0, 0.0), -Vec2::X, 1.0, 5.0);
        assert!(resolve_pair(&mut a, &mut b, 1.0).is_none());
    }

    #[test]
    fn head_on_equal_masses_swap_velocities() {
        let mut a = Circle::new(Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, 5.0);
        let mut b = Circle::new(Vec2::new(9.0, 0.0), Vec2::ZERO, 1.0, 5.0);
        resolve_pair(&mut a, &mut b, 1.0);
        assert!(a.vel.length() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn resolve_all_counts_each_pair_once() {
        let mut bodies = vec![
            Circle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, 5.0),
            Circle::new(Vec2::new(9.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 5.0),
            Circle::new(Vec2::new(100.0, 0.0), Vec2::ZERO, 1.0, 5.0),
        ];
        let p0 = total_momentum(&bodies);
        assert_eq!(resolve_all(&mut bodies, 1.0), 1);
        assert!((total_momentum(&bodies) - p0).length() < 1e-5);
    }

    #[test]
    fn pair_order_does_not_change_outcome() {
        let (a, b) = approaching_pair();
        let (mut a1, mut b1) = (a, b);
        resolve_pair(&mut a1, &mut b1, 0.9);
        let (mut a2, mut b2) = (a, b);
        resolve_pair(&mut b2, &mut a2, 0.9);
        assert!((a1.vel - a2.vel).length() < 1e-5);
        assert!((b1.vel - b2.vel).length() < 1e-5);
        assert!((a1.pos - a2.pos).length() < 1e-4);
    }
}
