use approx::assert_relative_eq;
use kugel::{
    collide::{CollisionQuery, Contact, RayHit, Surface, SurfaceMask},
    comp::{ControllerInputs, Pos, Vel},
    phys::{InputFrame, Mover},
    settings::MoveSettings,
    util::Dir,
};
use vek::*;

const DT: f32 = 1.0 / 50.0;
const EPSILON: f32 = 1e-4;

fn gravity() -> Vec3<f32> { Vec3::new(0.0, 0.0, -10.0) }

/// World with nothing to hit.
struct Void;

impl CollisionQuery for Void {
    fn raycast(
        &self,
        _origin: Vec3<f32>,
        _dir: Dir,
        _max_dist: f32,
        _mask: SurfaceMask,
    ) -> Option<RayHit> {
        None
    }

    fn boxcast(
        &self,
        _origin: Vec3<f32>,
        _half_extents: Vec3<f32>,
        _dir: Dir,
        _ori: Quaternion<f32>,
        _max_dist: f32,
    ) -> Option<f32> {
        None
    }
}

/// Infinite horizontal floor at a fixed height.
struct Floor {
    height: f32,
    surface: Surface,
}

impl CollisionQuery for Floor {
    fn raycast(
        &self,
        origin: Vec3<f32>,
        dir: Dir,
        max_dist: f32,
        mask: SurfaceMask,
    ) -> Option<RayHit> {
        if !mask.contains(self.surface.mask()) || dir.z >= 0.0 {
            return None;
        }
        let dist = (origin.z - self.height) / -dir.z;
        (dist >= 0.0 && dist <= max_dist).then(|| RayHit {
            normal: Dir::up(),
            dist,
            surface: self.surface,
        })
    }

    fn boxcast(
        &self,
        _origin: Vec3<f32>,
        _half_extents: Vec3<f32>,
        _dir: Dir,
        _ori: Quaternion<f32>,
        _max_dist: f32,
    ) -> Option<f32> {
        None
    }
}

fn contact(normal: Vec3<f32>, surface: Surface) -> Contact {
    Contact {
        normal: Dir::new(normal.normalized()),
        surface,
    }
}

fn flat_ground() -> Contact { contact(Vec3::unit_z(), Surface::Ground) }

/// Contact normal tilted `deg` degrees from the up axis.
fn tilted(deg: f32, surface: Surface) -> Contact {
    let rad = deg.to_radians();
    contact(Vec3::new(rad.sin(), 0.0, rad.cos()), surface)
}

#[test]
fn flat_contact_counts_as_ground() {
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );

    let state = mover.state();
    assert!(state.on_ground());
    assert_eq!(state.ground_contacts, 1);
    assert_eq!(state.steep_contacts, 0);
    assert_eq!(state.steps_since_grounded, 0);
    assert_relative_eq!(state.contact_normal.z, 1.0);
}

#[test]
fn slopes_below_threshold_are_ground_never_steep() {
    // Default max_ground_angle is 25 degrees.
    for deg in [0.0, 5.0, 10.0, 15.0, 20.0, 24.9] {
        let mut mover = Mover::new(MoveSettings::default().params());
        let mut vel = Vel::default();
        mover.tick(
            Pos::default(),
            &mut vel,
            &[tilted(deg, Surface::Ground)],
            &Void,
            gravity(),
            DT,
        );
        assert!(mover.state().on_ground(), "slope {deg} should be ground");
        assert_eq!(mover.state().steep_contacts, 0);
    }
}

#[test]
fn steep_slope_is_ground_only_on_stairs() {
    // 40 degrees: beyond max_ground_angle (25), within max_stairs_angle
    // (50).
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.tick(
        Pos::default(),
        &mut vel,
        &[tilted(40.0, Surface::Ground)],
        &Void,
        gravity(),
        DT,
    );
    assert!(!mover.state().on_ground());
    assert_eq!(mover.state().steep_contacts, 1);

    let mut mover = Mover::new(MoveSettings::default().params());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[tilted(40.0, Surface::Stairs)],
        &Void,
        gravity(),
        DT,
    );
    assert!(mover.state().on_ground());
    assert_eq!(mover.state().steep_contacts, 0);
}

#[test]
fn overhang_is_ignored() {
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.tick(
        Pos::default(),
        &mut vel,
        &[contact(-Vec3::unit_z(), Surface::Ground)],
        &Void,
        gravity(),
        DT,
    );

    let state = mover.state();
    assert!(!state.on_ground());
    assert_eq!(state.steep_contacts, 0);
    // Airborne default normal is the up axis.
    assert_relative_eq!(state.contact_normal.z, 1.0);
}

#[test]
fn jump_from_rest_reaches_apex_speed() {
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.apply_inputs(
        &ControllerInputs {
            move_dir: Vec2::zero(),
            jump: true,
        },
        &InputFrame::default(),
    );
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );

    // sqrt(2 * 10 * 2) = sqrt(40)
    assert_relative_eq!(vel.0.z, 40.0f32.sqrt(), epsilon = EPSILON);
    assert!(!mover.state().queued_jump);
    assert_eq!(mover.state().jump_phase, 1);
    assert_eq!(mover.state().steps_since_jump, 0);
}

#[test]
fn jump_budget_refills_only_after_the_launch_tick() {
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    let jump_inputs = ControllerInputs {
        move_dir: Vec2::zero(),
        jump: true,
    };

    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_eq!(mover.state().jump_phase, 1);

    // The ground contact is still reported on the tick right after launch.
    // The phase must not reset yet, so a jump queued now chains onto the
    // launch instead of starting fresh.
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_eq!(mover.state().jump_phase, 2);
    // The chained jump is fully absorbed by the aligned launch speed.
    assert_relative_eq!(vel.0.z, 40.0f32.sqrt(), epsilon = EPSILON);

    // Two further grounded ticks without jumping and the budget refills.
    for _ in 0..2 {
        mover.tick(
            Pos::default(),
            &mut vel,
            &[flat_ground()],
            &Void,
            gravity(),
            DT,
        );
    }
    assert_eq!(mover.state().jump_phase, 0);
}

#[test]
fn air_jump_budget_is_enforced() {
    let settings = MoveSettings {
        max_air_jumps: 1,
        ..Default::default()
    };
    let mut mover = Mover::new(settings.params());
    let mut vel = Vel::default();
    let jump_inputs = ControllerInputs {
        move_dir: Vec2::zero(),
        jump: true,
    };

    // Launch from the ground.
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_eq!(mover.state().jump_phase, 1);

    // One air jump is granted.
    vel.0.z = -2.0;
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(Pos::default(), &mut vel, &[], &Void, gravity(), DT);
    assert_eq!(mover.state().jump_phase, 2);
    assert_relative_eq!(vel.0.z, -2.0 + 40.0f32.sqrt(), epsilon = EPSILON);

    // A third request while airborne is rejected.
    vel.0.z = -2.0;
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(Pos::default(), &mut vel, &[], &Void, gravity(), DT);
    assert_eq!(mover.state().jump_phase, 2);
    assert_relative_eq!(vel.0.z, -2.0, epsilon = EPSILON);
}

#[test]
fn no_free_jump_after_walking_off_a_ledge() {
    // Zero air jumps: leaving the ground without jumping must not allow a
    // jump mid-air.
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();

    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    vel.0.z = -2.0;
    mover.apply_inputs(
        &ControllerInputs {
            move_dir: Vec2::zero(),
            jump: true,
        },
        &InputFrame::default(),
    );
    mover.tick(Pos::default(), &mut vel, &[], &Void, gravity(), DT);

    assert_eq!(mover.state().jump_phase, 0);
    assert_relative_eq!(vel.0.z, -2.0, epsilon = EPSILON);
}

#[test]
fn wall_jump_refills_the_budget() {
    let settings = MoveSettings {
        max_air_jumps: 1,
        ..Default::default()
    };
    let mut mover = Mover::new(settings.params());
    let mut vel = Vel::default();
    let jump_inputs = ControllerInputs {
        move_dir: Vec2::zero(),
        jump: true,
    };

    // Exhaust the budget: launch plus one air jump.
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(Pos::default(), &mut vel, &[], &Void, gravity(), DT);
    assert_eq!(mover.state().jump_phase, 2);

    // Touching a wall resets the phase and grants a fresh jump.
    vel.0 = Vec3::new(0.0, 0.0, -2.0);
    mover.apply_inputs(&jump_inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[contact(Vec3::unit_x(), Surface::Ground)],
        &Void,
        gravity(),
        DT,
    );
    assert_eq!(mover.state().jump_phase, 1);
    // Jump direction is the wall normal biased upward.
    assert!(vel.0.x > 0.0);
    assert!(vel.0.z > -2.0);
}

#[test]
fn snap_to_ground_preserves_speed() {
    // Disable acceleration so the only velocity change is the snap
    // reprojection.
    let settings = MoveSettings {
        max_acceleration: 0.0,
        max_air_acceleration: 0.0,
        ..Default::default()
    };
    let mut mover = Mover::new(settings.params());
    let floor = Floor {
        height: 0.0,
        surface: Surface::Ground,
    };
    let pos = Pos(Vec3::new(0.0, 0.0, 0.5));
    // Speed 5, with an outward (upward) component as if leaving a slope
    // crest.
    let mut vel = Vel(Vec3::new(4.0, 0.0, 3.0));

    for _ in 0..3 {
        mover.tick(pos, &mut vel, &[flat_ground()], &floor, gravity(), DT);
    }
    // Contact lost for exactly one tick, floor still within probe range.
    mover.tick(pos, &mut vel, &[], &floor, gravity(), DT);

    let state = mover.state();
    assert_eq!(state.ground_contacts, 1);
    assert_eq!(state.steps_since_grounded, 0);
    assert_relative_eq!(vel.0.magnitude(), 5.0, epsilon = EPSILON);
    assert_relative_eq!(vel.0.z, 0.0, epsilon = EPSILON);
}

#[test]
fn snap_respects_probe_distance() {
    let settings = MoveSettings {
        max_acceleration: 0.0,
        max_air_acceleration: 0.0,
        ..Default::default()
    };
    let mut mover = Mover::new(settings.params());
    // Floor below the 1.0 probe distance.
    let floor = Floor {
        height: -2.0,
        surface: Surface::Ground,
    };
    let pos = Pos(Vec3::zero());
    let mut vel = Vel(Vec3::new(5.0, 0.0, 0.0));

    for _ in 0..3 {
        mover.tick(pos, &mut vel, &[flat_ground()], &floor, gravity(), DT);
    }
    mover.tick(pos, &mut vel, &[], &floor, gravity(), DT);

    assert!(!mover.state().on_ground());
}

#[test]
fn steep_corner_promotes_to_virtual_ground() {
    // Two opposing near-vertical walls average to an upward normal.
    let wall_z = 0.1f32;
    let wall_x = (1.0 - wall_z * wall_z).sqrt();
    let contacts = [
        contact(Vec3::new(wall_x, 0.0, wall_z), Surface::Ground),
        contact(Vec3::new(-wall_x, 0.0, wall_z), Surface::Ground),
    ];

    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.tick(Pos::default(), &mut vel, &contacts, &Void, gravity(), DT);

    let state = mover.state();
    assert!(state.on_ground());
    assert_eq!(state.ground_contacts, 1);
    assert_relative_eq!(state.contact_normal.z, 1.0, epsilon = EPSILON);
}

#[test]
fn velocity_approach_is_clamped_and_does_not_overshoot() {
    // Default acceleration: 10 units/s^2, so 0.2 units/s per tick.
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    let inputs = ControllerInputs {
        move_dir: Vec2::new(1.0, 0.0),
        jump: false,
    };

    mover.apply_inputs(&inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_relative_eq!(vel.0.x, 0.2, epsilon = EPSILON);

    mover.apply_inputs(&inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    // Linear clamp, not exponential decay.
    assert_relative_eq!(vel.0.x, 0.4, epsilon = EPSILON);

    // With headroom to spare, a second solve with identical inputs is a
    // no-op: the approach reaches the target and stays there.
    let settings = MoveSettings {
        max_acceleration: 1000.0,
        ..Default::default()
    };
    let mut mover = Mover::new(settings.params());
    let mut vel = Vel::default();
    mover.apply_inputs(&inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_relative_eq!(vel.0.x, 10.0, epsilon = EPSILON);
    mover.apply_inputs(&inputs, &InputFrame::default());
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        gravity(),
        DT,
    );
    assert_relative_eq!(vel.0.x, 10.0, epsilon = EPSILON);
}

#[test]
fn move_input_is_clamped_and_mapped_through_the_frame() {
    let mut mover = Mover::new(MoveSettings::default().params());
    mover.apply_inputs(
        &ControllerInputs {
            move_dir: Vec2::new(3.0, 4.0),
            jump: false,
        },
        &InputFrame::default(),
    );
    let desired = mover.state().desired_vel;
    assert_relative_eq!(desired.x, 6.0, epsilon = EPSILON);
    assert_relative_eq!(desired.y, 8.0, epsilon = EPSILON);
    assert_relative_eq!(desired.magnitude(), 10.0, epsilon = EPSILON);

    // A camera yawed 90 degrees maps "forward" input to +x.
    let frame = InputFrame {
        right: Dir::new(Vec3::new(0.0, -1.0, 0.0)),
        forward: Dir::new(Vec3::new(1.0, 0.0, 0.0)),
    };
    mover.apply_inputs(
        &ControllerInputs {
            move_dir: Vec2::new(0.0, 1.0),
            jump: false,
        },
        &frame,
    );
    let desired = mover.state().desired_vel;
    assert_relative_eq!(desired.x, 10.0, epsilon = EPSILON);
    assert_relative_eq!(desired.y, 0.0, epsilon = EPSILON);
}

#[test]
fn jump_speed_follows_gravity_magnitude() {
    let mut mover = Mover::new(MoveSettings::default().params());
    let mut vel = Vel::default();
    mover.apply_inputs(
        &ControllerInputs {
            move_dir: Vec2::zero(),
            jump: true,
        },
        &InputFrame::default(),
    );
    mover.tick(
        Pos::default(),
        &mut vel,
        &[flat_ground()],
        &Void,
        Vec3::new(0.0, 0.0, -20.0),
        DT,
    );
    assert_relative_eq!(vel.0.z, 80.0f32.sqrt(), epsilon = EPSILON);
}
