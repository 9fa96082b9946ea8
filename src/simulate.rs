use na::DVector;
use tracing::{debug, error, trace};

use crate::{
    engine::{DynamicsEngine, GeneralizedForceMap},
    error::{check_dimension, check_finite, SimError},
    kinematics::KinematicState,
    spatial::transform::Transform3D,
    spring::{SpringContact, SpringParameters},
    types::Float,
};

/// Which foot a contact belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Step duration, sub-step count and contact springs of a simulation
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub dt: Float,
    pub n_substeps: usize,
    pub left_frame: String,
    pub right_frame: String,
    pub left_spring: SpringParameters,
    pub right_spring: SpringParameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dt: 1e-3,
            n_substeps: 10,
            left_frame: "lankle".to_string(),
            right_frame: "rankle".to_string(),
            left_spring: SpringParameters::default(),
            right_spring: SpringParameters::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_dt(mut self, dt: Float) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_substeps(mut self, n_substeps: usize) -> Self {
        self.n_substeps = n_substeps;
        self
    }

    pub fn with_frames(mut self, left: &str, right: &str) -> Self {
        self.left_frame = left.to_string();
        self.right_frame = right.to_string();
        self
    }

    /// Use the same spring on both contacts
    pub fn with_springs(mut self, params: SpringParameters) -> Self {
        self.left_spring = params.clone();
        self.right_spring = params;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.dt.is_finite() || self.dt <= 0. {
            return Err(SimError::invalid_config(format!(
                "step duration must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.n_substeps == 0 {
            return Err(SimError::invalid_config("sub-step count must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration, velocity and the most recent acceleration of a simulated
/// model
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub q: DVector<Float>,
    pub v: DVector<Float>,
    pub vdot: DVector<Float>,
}

impl SimulationState {
    pub fn new(q: DVector<Float>, v: DVector<Float>) -> Self {
        let vdot = DVector::zeros(v.len());
        SimulationState { q, v, vdot }
    }
}

/// Sub-stepped semi-implicit Euler simulation of a model standing on two
/// spring contacts.
///
/// Each sub-step refreshes kinematics, computes both spring wrenches, solves
/// forward dynamics and updates v then q. Rest poses are recorded once, at
/// construction.
pub struct Simulation<E: DynamicsEngine> {
    engine: E,
    config: SimulationConfig,
    left: SpringContact,
    right: SpringContact,
    vdot: DVector<Float>,
    time: Float,
}

impl<E: DynamicsEngine> Simulation<E> {
    /// Build a simulation, recording the rest poses of both contact frames at
    /// q0, or at the engine's neutral configuration if q0 is not given.
    pub fn new(
        engine: E,
        q0: Option<&DVector<Float>>,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;

        let q0 = match q0 {
            Some(q0) => q0.clone(),
            None => engine.neutral_configuration(),
        };
        check_dimension("configuration", engine.nq(), q0.len())?;

        let kinematics = engine.forward_kinematics(&q0, &DVector::zeros(engine.nv()));
        let left = SpringContact::new(
            &engine,
            &config.left_frame,
            &kinematics,
            config.left_spring.clone(),
        )?;
        let right = SpringContact::new(
            &engine,
            &config.right_frame,
            &kinematics,
            config.right_spring.clone(),
        )?;

        debug!(
            nq = engine.nq(),
            nv = engine.nv(),
            dt = config.dt,
            n_substeps = config.n_substeps,
            "simulation created"
        );
        let vdot = DVector::zeros(engine.nv());
        Ok(Simulation {
            engine,
            config,
            left,
            right,
            vdot,
            time: 0.,
        })
    }

    /// Sum of both spring wrenches, each on the body carrying its contact
    /// frame
    pub fn contact_forces(&self, kinematics: &KinematicState) -> GeneralizedForceMap {
        let mut forces = GeneralizedForceMap::zeros(&self.engine);
        for contact in [&self.left, &self.right] {
            let (body, wrench) = contact.wrench(&self.engine, kinematics);
            forces.apply(body, &wrench);
        }
        forces
    }

    fn check_inputs(
        &self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
    ) -> Result<(), SimError> {
        check_dimension("configuration", self.engine.nq(), q.len())?;
        check_dimension("velocity", self.engine.nv(), v.len())?;
        check_dimension("torque", self.engine.nv(), tau.len())
    }

    /// One sub-step of duration dt. Returns (q, v, vdot).
    fn advance_substep(
        &self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
        dt: Float,
    ) -> Result<(DVector<Float>, DVector<Float>, DVector<Float>), SimError> {
        let kinematics = self.engine.forward_kinematics(q, v);
        let forces = self.contact_forces(&kinematics);
        let vdot = self.engine.forward_dynamics(q, v, tau, &forces)?;
        check_dimension("acceleration", self.engine.nv(), vdot.len())?;

        // Semi-implicit Euler integration
        let v_next = v + &vdot * dt;
        if let Err(e) = check_finite("acceleration", vdot.iter())
            .and_then(|_| check_finite("velocity", v_next.iter()))
        {
            error!(time = self.time, "{}", e);
            return Err(e);
        }
        let q_next = self.engine.integrate(q, &(&v_next * dt));

        Ok((q_next, v_next, vdot))
    }

    /// Advance (q, v) by one sub-step of duration dt and record the
    /// acceleration.
    pub fn substep(
        &mut self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
        dt: Float,
    ) -> Result<(DVector<Float>, DVector<Float>), SimError> {
        self.check_inputs(q, v, tau)?;
        let (q_next, v_next, vdot) = self.advance_substep(q, v, tau, dt)?;
        self.vdot = vdot;
        self.time += dt;
        Ok((q_next, v_next))
    }

    /// Advance (q, v) by dt through n_substeps sub-steps under constant
    /// torque tau. Nothing is recorded unless every sub-step succeeds.
    pub fn step(
        &mut self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        tau: &DVector<Float>,
    ) -> Result<(DVector<Float>, DVector<Float>), SimError> {
        self.check_inputs(q, v, tau)?;

        let h = self.config.dt / self.config.n_substeps as Float;
        let mut q = q.clone();
        let mut v = v.clone();
        let mut vdot = self.vdot.clone();
        for _ in 0..self.config.n_substeps {
            (q, v, vdot) = self.advance_substep(&q, &v, tau, h)?;
        }

        self.vdot = vdot;
        self.time += self.config.dt;
        trace!(time = self.time, "step");
        Ok((q, v))
    }

    /// Step a simulation state in place. The state is untouched on error.
    pub fn advance(&mut self, state: &mut SimulationState, tau: &DVector<Float>) -> Result<(), SimError> {
        let (q, v) = self.step(&state.q, &state.v, tau)?;
        state.q = q;
        state.v = v;
        state.vdot = self.vdot.clone();
        Ok(())
    }

    /// Step from (q, v) until final_time, asking `control` for the torques of
    /// each step. Returns the configurations and velocities of every step,
    /// initial state included.
    pub fn simulate<F>(
        &mut self,
        q: &DVector<Float>,
        v: &DVector<Float>,
        final_time: Float,
        mut control: F,
    ) -> Result<(Vec<DVector<Float>>, Vec<DVector<Float>>), SimError>
    where
        F: FnMut(&DVector<Float>, &DVector<Float>) -> DVector<Float>,
    {
        let num_steps = (final_time / self.config.dt).round() as usize;
        let mut qs = vec![q.clone()];
        let mut vs = vec![v.clone()];
        for _ in 0..num_steps {
            let (q, v) = (&qs[qs.len() - 1], &vs[vs.len() - 1]);
            let tau = control(q, v);
            let (q, v) = self.step(q, v, &tau)?;
            qs.push(q);
            vs.push(v);
        }
        Ok((qs, vs))
    }

    /// Elastic energy stored in both springs at configuration q
    pub fn spring_energy(&self, q: &DVector<Float>) -> Result<Float, SimError> {
        check_dimension("configuration", self.engine.nq(), q.len())?;
        let kinematics = self
            .engine
            .forward_kinematics(q, &DVector::zeros(self.engine.nv()));
        Ok([&self.left, &self.right]
            .iter()
            .map(|contact| contact.potential_energy(&contact.frame_state(&self.engine, &kinematics)))
            .sum())
    }

    /// Acceleration of the last successful step or sub-step
    pub fn acceleration(&self) -> &DVector<Float> {
        &self.vdot
    }

    pub fn contact(&self, side: Side) -> &SpringContact {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn rest_pose(&self, side: Side) -> &Transform3D {
        &self.contact(side).rest_pose
    }

    pub fn dt(&self) -> Float {
        self.config.dt
    }

    pub fn n_substeps(&self) -> usize {
        self.config.n_substeps
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Total simulated time so far
    pub fn time(&self) -> Float {
        self.time
    }
}

#[cfg(test)]
mod simulate_tests {
    use na::{dvector, vector, Vector3};

    use super::*;
    use crate::{
        assert_close, assert_vec_close,
        builders::{build_biped, build_slider, SLIDER_LEFT, SLIDER_RIGHT},
        kinematics::Frame,
        mechanism::Mechanism,
        spatial::twist::Twist,
        BodyId, FrameId, WORLD_FRAME,
    };

    /// A point mass moving along world y, with both contact frames at the
    /// mass. Implements the engine trait directly.
    struct PointMass {
        m: Float,
        frames: Vec<Frame>,
        nv_out: usize, // length of the acceleration it reports
    }

    impl PointMass {
        fn new(m: Float) -> Self {
            let frames = ["left", "right"]
                .iter()
                .map(|name| Frame {
                    name: name.to_string(),
                    parent: 1,
                    placement: Transform3D::identity(name, "mass"),
                })
                .collect();
            PointMass {
                m,
                frames,
                nv_out: 1,
            }
        }
    }

    impl DynamicsEngine for PointMass {
        fn nq(&self) -> usize {
            1
        }

        fn nv(&self) -> usize {
            1
        }

        fn nbodies(&self) -> usize {
            2
        }

        fn body_frame(&self, body: BodyId) -> &str {
            if body == 0 {
                WORLD_FRAME
            } else {
                "mass"
            }
        }

        fn neutral_configuration(&self) -> DVector<Float> {
            dvector![0.]
        }

        fn frame_id(&self, name: &str) -> Option<FrameId> {
            self.frames.iter().position(|frame| frame.name == name)
        }

        fn frame(&self, id: FrameId) -> &Frame {
            &self.frames[id]
        }

        fn forward_kinematics(&self, q: &DVector<Float>, v: &DVector<Float>) -> KinematicState {
            KinematicState {
                bodies_to_root: vec![
                    Transform3D::identity(WORLD_FRAME, WORLD_FRAME),
                    Transform3D::move_xyz("mass", WORLD_FRAME, 0., q[0], 0.),
                ],
                twists: vec![
                    Twist::zero(WORLD_FRAME, WORLD_FRAME),
                    Twist {
                        body: "mass".to_string(),
                        base: WORLD_FRAME.to_string(),
                        frame: WORLD_FRAME.to_string(),
                        angular: Vector3::zeros(),
                        linear: vector![0., v[0], 0.],
                    },
                ],
            }
        }

        fn forward_dynamics(
            &self,
            _q: &DVector<Float>,
            _v: &DVector<Float>,
            tau: &DVector<Float>,
            forces: &GeneralizedForceMap,
        ) -> Result<DVector<Float>, SimError> {
            let a = (tau[0] + forces.get(1).linear.y) / self.m;
            Ok(DVector::from_element(self.nv_out, a))
        }

        fn integrate(&self, q: &DVector<Float>, dv: &DVector<Float>) -> DVector<Float> {
            q + dv
        }
    }

    fn slider_simulation(m: Float, n_substeps: usize) -> Simulation<Mechanism> {
        let config = SimulationConfig::default()
            .with_frames(SLIDER_LEFT, SLIDER_RIGHT)
            .with_substeps(n_substeps);
        Simulation::new(build_slider(m).unwrap(), None, config).unwrap()
    }

    #[test]
    fn springs_pull_point_mass_back() {
        // Arrange
        let m = 2.0;
        let config = SimulationConfig::default()
            .with_frames("left", "right")
            .with_substeps(1);
        let mut simulation = Simulation::new(PointMass::new(m), None, config).unwrap();

        // Act
        let (q, v) = simulation
            .step(&dvector![0.01], &dvector![0.], &dvector![0.])
            .unwrap();

        // Assert
        let vdot = -2. * 20000. * 0.01 / m;
        assert_close!(simulation.acceleration()[0], vdot, 1e-9);
        assert_close!(v[0], vdot * 1e-3, 1e-12);
        assert_close!(q[0], 0.01 + vdot * 1e-6, 1e-12);
        assert_close!(simulation.time(), 1e-3, 1e-15);
    }

    #[test]
    fn torque_reaches_engine() {
        let config = SimulationConfig::default()
            .with_frames("left", "right")
            .with_substeps(1);
        let mut simulation = Simulation::new(PointMass::new(4.0), None, config).unwrap();

        simulation
            .step(&dvector![0.], &dvector![0.], &dvector![8.])
            .unwrap();

        assert_close!(simulation.acceleration()[0], 2., 1e-9);
    }

    #[test]
    fn step_threads_substeps() {
        // Arrange
        let mut stepped = slider_simulation(10., 4);
        let mut substepped = slider_simulation(10., 4);
        let q0 = dvector![0.01];
        let v0 = dvector![0.3];
        let tau = dvector![1.];

        // Act
        let (q, v) = stepped.step(&q0, &v0, &tau).unwrap();
        let (mut q_sub, mut v_sub) = (q0.clone(), v0.clone());
        for _ in 0..4 {
            (q_sub, v_sub) = substepped.substep(&q_sub, &v_sub, &tau, 1e-3 / 4.).unwrap();
        }

        // Assert
        assert_eq!(q, q_sub);
        assert_eq!(v, v_sub);
        assert_eq!(stepped.acceleration(), substepped.acceleration());
        assert_close!(stepped.time(), substepped.time(), 1e-15);
    }

    /// Two lateral springs of stiffness k on a block of mass m oscillate at
    /// sqrt(2k / m). Doubling the sub-step count halves the error.
    #[test]
    fn substeps_converge_to_oscillator() {
        // Arrange
        let m: Float = 10.;
        let k: Float = 20000.;
        let omega = (2. * k / m).sqrt();
        let y0 = 0.01;
        let num_steps = 75;
        let final_time = num_steps as Float * 1e-3;
        let analytic = y0 * (omega * final_time).cos();

        // Act
        let mut errors = vec![];
        let mut finals = vec![];
        for n_substeps in [10, 20] {
            let mut simulation = slider_simulation(m, n_substeps);
            let (qs, _) = simulation
                .simulate(&dvector![y0], &dvector![0.], final_time, |_, _| dvector![0.])
                .unwrap();
            assert_eq!(qs.len(), num_steps + 1);
            let y = qs[num_steps][0];
            errors.push((y - analytic).abs());
            finals.push(y);
        }

        // Assert
        assert!(errors[0] < 1e-4, "error with N sub-steps: {}", errors[0]);
        assert!(errors[1] < errors[0]);
        assert_close!(finals[0], finals[1], 5e-5);
    }

    #[test]
    fn oscillator_energy_approximately_conserved() {
        // Arrange
        let m: Float = 10.;
        let mut simulation = slider_simulation(m, 10);
        let mut state = SimulationState::new(dvector![0.01], dvector![0.]);
        let energy = |simulation: &Simulation<Mechanism>, state: &SimulationState| {
            0.5 * m * state.v[0] * state.v[0] + simulation.spring_energy(&state.q).unwrap()
        };
        let e0 = energy(&simulation, &state);

        // Act
        let mut max_drift: Float = 0.;
        for _ in 0..200 {
            simulation.advance(&mut state, &dvector![0.]).unwrap();
            max_drift = max_drift.max((energy(&simulation, &state) - e0).abs());
        }

        // Assert
        assert_close!(e0, 0.5 * 2. * 20000. * 0.01 * 0.01, 1e-9);
        assert!(max_drift / e0 < 0.02, "energy drift {}", max_drift / e0);
    }

    #[test]
    fn biped_stays_bounded_under_zero_torque() {
        // Arrange
        let biped = build_biped().unwrap();
        let q_rest = biped.neutral_configuration();
        let nv = biped.nv();
        let mut simulation =
            Simulation::new(biped, Some(&q_rest), SimulationConfig::default()).unwrap();
        let mut q = q_rest.clone();
        q[5] -= 0.02; // pelvis y
        q[6] -= 0.02; // pelvis z
        let mut state = SimulationState::new(q, DVector::zeros(nv));

        // Act
        for _ in 0..30 {
            simulation.advance(&mut state, &DVector::zeros(nv)).unwrap();
        }

        // Assert
        assert_close!(simulation.time(), 0.03, 1e-12);
        assert!(state.q.iter().all(|x| x.is_finite()));
        assert!(state.v.norm() < 1e3, "velocity blew up: {}", state.v.norm());
        assert_close!(state.q.rows(0, 4).norm(), 1., 1e-9);
        assert!((state.q[5] - q_rest[5]).abs() < 0.5);
        assert!((state.q[6] - q_rest[6]).abs() < 0.5);
    }

    /// Without a controller the joints are free, so the biped eventually
    /// folds. Stepping must then stop with an error instead of panicking or
    /// returning non-finite state.
    #[test]
    fn passive_biped_collapse_fails_cleanly() {
        // Arrange
        let biped = build_biped().unwrap();
        let q_rest = biped.neutral_configuration();
        let nv = biped.nv();
        let mut simulation =
            Simulation::new(biped, Some(&q_rest), SimulationConfig::default()).unwrap();
        let mut q = q_rest.clone();
        q[5] -= 0.02;
        q[6] -= 0.02;
        let mut state = SimulationState::new(q, DVector::zeros(nv));

        // Act
        for _ in 0..2000 {
            let before = state.clone();
            match simulation.advance(&mut state, &DVector::zeros(nv)) {
                Ok(()) => {
                    // Assert
                    assert!(state.q.iter().chain(state.v.iter()).all(|x| x.is_finite()));
                }
                Err(e) => {
                    // Assert
                    assert!(e.is_diverged(), "unexpected error: {}", e);
                    assert_eq!(state, before);
                    break;
                }
            }
        }
    }

    #[test]
    fn biped_rest_poses_match_ankles() {
        let biped = build_biped().unwrap();
        let simulation = Simulation::new(biped, None, SimulationConfig::default()).unwrap();

        let left = simulation.rest_pose(Side::Left);
        let right = simulation.rest_pose(Side::Right);

        assert_eq!(left.from, "lankle_rest");
        assert_eq!(right.from, "rankle_rest");
        assert_eq!(left.to, WORLD_FRAME);
        assert_vec_close!(left.trans(), vector![0., 0.1, 0.], 1e-12);
        assert_vec_close!(right.trans(), vector![0., -0.1, 0.], 1e-12);
        assert_eq!(simulation.contact(Side::Left).name, "lankle");
        assert_eq!(simulation.dt(), 1e-3);
        assert_eq!(simulation.n_substeps(), 10);
    }

    #[test]
    fn wrong_configuration_length_is_mismatch() {
        // Arrange
        let mut simulation = slider_simulation(1., 10);
        let q = dvector![0.01, 0.];
        let v = dvector![0.];
        let tau = dvector![0.];

        // Act
        let result = simulation.step(&q, &v, &tau);

        // Assert
        assert_eq!(result, Err(SimError::mismatch("configuration", 1, 2)));
        assert_eq!(q, dvector![0.01, 0.]);
        assert_eq!(simulation.acceleration(), &dvector![0.]);
        assert_eq!(simulation.time(), 0.);
    }

    #[test]
    fn wrong_torque_length_is_mismatch() {
        let mut simulation = slider_simulation(1., 10);

        let result = simulation.step(&dvector![0.], &dvector![0.], &DVector::zeros(0));

        assert_eq!(result, Err(SimError::mismatch("torque", 1, 0)));
    }

    #[test]
    fn wrong_velocity_length_is_mismatch() {
        // Arrange
        let mut simulation = slider_simulation(1., 10);
        let v = dvector![0., 0., 0.];

        // Act
        let result = simulation.step(&dvector![0.01], &v, &dvector![0.]);

        // Assert
        assert_eq!(result, Err(SimError::mismatch("velocity", 1, 3)));
        assert_eq!(v, dvector![0., 0., 0.]);
        assert_eq!(simulation.time(), 0.);
    }

    #[test]
    fn wrong_acceleration_length_from_engine_is_mismatch() {
        // Arrange
        let mut engine = PointMass::new(1.0);
        engine.nv_out = 2;
        let config = SimulationConfig::default().with_frames("left", "right");
        let mut simulation = Simulation::new(engine, None, config).unwrap();

        // Act
        let result = simulation.step(&dvector![0.], &dvector![0.], &dvector![0.]);

        // Assert
        assert_eq!(result, Err(SimError::mismatch("acceleration", 1, 2)));
        assert_eq!(simulation.acceleration(), &dvector![0.]);
    }

    #[test]
    fn custom_springs_apply_to_both_contacts() {
        // Arrange
        let params = SpringParameters::new(1000., 0., 0.);
        let config = SimulationConfig::default()
            .with_frames("left", "right")
            .with_substeps(1)
            .with_springs(params.clone());

        // Act
        let mut simulation = Simulation::new(PointMass::new(2.0), None, config).unwrap();
        simulation
            .step(&dvector![0.01], &dvector![0.], &dvector![0.])
            .unwrap();

        // Assert
        assert_eq!(simulation.contact(Side::Left).params, params);
        assert_eq!(simulation.contact(Side::Right).params, params);
        assert_close!(simulation.acceleration()[0], -2. * 1000. * 0.01 / 2., 1e-9);
    }

    #[test]
    fn wrong_initial_configuration_is_mismatch() {
        let result = Simulation::new(
            build_slider(1.).unwrap(),
            Some(&dvector![0., 0.]),
            SimulationConfig::default().with_frames(SLIDER_LEFT, SLIDER_RIGHT),
        );

        assert_eq!(result.err(), Some(SimError::mismatch("configuration", 1, 2)));
    }

    #[test]
    fn unknown_frame_at_construction() {
        let config = SimulationConfig::default().with_frames("lankle", "rfoot");

        let result = Simulation::new(build_biped().unwrap(), None, config);

        assert_eq!(result.err(), Some(SimError::unknown_frame("rfoot")));
    }

    #[test]
    fn invalid_config_is_rejected() {
        for config in [
            SimulationConfig::default().with_dt(0.),
            SimulationConfig::default().with_dt(-1e-3),
            SimulationConfig::default().with_dt(Float::NAN),
            SimulationConfig::default().with_substeps(0),
        ] {
            let result = Simulation::new(build_biped().unwrap(), None, config);

            assert!(matches!(result.err(), Some(SimError::InvalidConfig { .. })));
        }
    }

    #[test]
    fn divergence_leaves_state_untouched() {
        // Arrange
        let mut simulation = slider_simulation(1., 10);
        let mut state = SimulationState::new(dvector![0.01], dvector![0.]);
        simulation.advance(&mut state, &dvector![0.]).unwrap();
        let before = state.clone();
        let acceleration = simulation.acceleration().clone();

        // Act
        let result = simulation.advance(&mut state, &dvector![Float::NAN]);

        // Assert
        assert!(result.unwrap_err().is_diverged());
        assert_eq!(state, before);
        assert_eq!(simulation.acceleration(), &acceleration);
        assert_close!(simulation.time(), 1e-3, 1e-15);
    }

    #[test]
    fn simulate_asks_control_every_step() {
        // Arrange
        let config = SimulationConfig::default().with_frames("left", "right");
        let mut simulation = Simulation::new(PointMass::new(1.0), None, config).unwrap();
        let mut calls = 0;

        // Act
        let (qs, vs) = simulation
            .simulate(&dvector![0.], &dvector![0.], 5e-3, |_, _| {
                calls += 1;
                dvector![1.]
            })
            .unwrap();

        // Assert
        assert_eq!(calls, 5);
        assert_eq!(qs.len(), 6);
        assert_eq!(vs.len(), 6);
        assert!(vs.windows(2).all(|pair| pair[1][0] > pair[0][0]));
        assert!(qs[5][0] > 0.);
        assert_close!(simulation.time(), 5e-3, 1e-15);
    }
}
