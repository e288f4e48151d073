use api::landmarks::{hand, pose};
use glam::Vec3;
use log::{debug, info, trace, warn};

use crate::smoothing::{propagate_fraction, smooth};
use crate::solver::solve_directional_rotation;
use crate::{
    math, BoneId, CoordinateAdapter, FaceResult, FrameInput, Landmark, LandmarkSpace, MorphMesh,
    PointFilter, RetargetConfig, Side, Skeleton, SkipReason,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No input stream carried data.
    #[default]
    Idle,
    /// The frame's timestamp did not advance; nothing was resolved.
    Stale,
    Active,
    /// The retargeter was torn down and no longer touches the rig.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBone {
    pub bone: String,
    pub reason: SkipReason,
}

/// What one tick did to the rig.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub state: FrameState,
    pub bones_updated: usize,
    pub morphs_updated: usize,
    pub skipped: Vec<SkippedBone>,
}

impl FrameReport {
    fn with_state(state: FrameState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    fn skip(&mut self, bone: &str, reason: SkipReason) {
        match reason {
            SkipReason::DegenerateGeometry => debug!("{}: {}", bone, reason),
            _ => trace!("{}: {}", bone, reason),
        }
        self.skipped.push(SkippedBone {
            bone: bone.to_string(),
            reason,
        });
    }

    pub fn skip_reason(&self, bone: &str) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.bone == bone)
            .map(|s| s.reason)
    }
}

#[derive(Debug, Clone)]
struct BoneSlot {
    name: String,
    id: Option<BoneId>,
}

impl BoneSlot {
    fn resolve(skeleton: &Skeleton, config: &RetargetConfig, base: &str) -> Self {
        let name = config.bone_name(base);
        let id = skeleton.resolve(&name);
        Self { name, id }
    }
}

#[derive(Debug, Clone)]
struct ArmSlots {
    shoulder: BoneSlot,
    upper_arm: BoneSlot,
    forearm: BoneSlot,
}

#[derive(Debug, Clone)]
struct HandSlots {
    hand: BoneSlot,
    fingers: Vec<[BoneSlot; 3]>,
}

/// Rig bones the retargeter drives, resolved once per skeleton.
#[derive(Debug, Clone)]
struct RigBindings {
    skeleton_id: u64,
    bone_count: usize,
    head: BoneSlot,
    neck: BoneSlot,
    spine: BoneSlot,
    arms: [ArmSlots; 2],
    hands: [HandSlots; 2],
}

impl RigBindings {
    fn bind(skeleton: &Skeleton, config: &RetargetConfig) -> Self {
        let slot = |base: &str| BoneSlot::resolve(skeleton, config, base);
        let arm = |side: Side| {
            let s = side.as_str();
            ArmSlots {
                shoulder: slot(&format!("{}Shoulder", s)),
                upper_arm: slot(&format!("{}Arm", s)),
                forearm: slot(&format!("{}ForeArm", s)),
            }
        };
        let hand_slots = |side: Side| {
            let s = side.as_str();
            HandSlots {
                hand: slot(&format!("{}Hand", s)),
                fingers: hand::FINGERS
                    .iter()
                    .map(|(finger, _)| {
                        [1, 2, 3].map(|segment| slot(&format!("{}Hand{}{}", s, finger, segment)))
                    })
                    .collect(),
            }
        };

        Self {
            skeleton_id: skeleton.id(),
            bone_count: skeleton.len(),
            head: slot("Head"),
            neck: slot("Neck"),
            spine: slot("Spine2"),
            arms: [arm(Side::Left), arm(Side::Right)],
            hands: [hand_slots(Side::Left), hand_slots(Side::Right)],
        }
    }

    /// Bindings stay valid only for the skeleton they were resolved against,
    /// and only while no bones were added to it.
    fn matches(&self, skeleton: &Skeleton) -> bool {
        self.skeleton_id == skeleton.id() && self.bone_count == skeleton.len()
    }

    fn slots(&self) -> Vec<&BoneSlot> {
        let mut slots = vec![&self.head, &self.neck, &self.spine];
        for arm in &self.arms {
            slots.extend([&arm.shoulder, &arm.upper_arm, &arm.forearm]);
        }
        for hand in &self.hands {
            slots.push(&hand.hand);
            for finger in &hand.fingers {
                slots.extend(finger.iter());
            }
        }
        slots
    }
}

/// Engine-space joints of one frame. `None` marks a joint that was not
/// reported or did not pass the visibility gate.
type Points = Vec<Option<Vec3>>;

struct PreparedHand {
    label: String,
    side: Option<Side>,
    points: Points,
}

fn point(points: &Points, index: usize) -> Option<Vec3> {
    points.get(index).copied().flatten()
}

/// Borrow of the rig for the duration of one solve pass.
struct SolvePass<'a> {
    skeleton: &'a mut Skeleton,
    axis: Vec3,
    factor: f32,
    report: &'a mut FrameReport,
}

impl SolvePass<'_> {
    /// Points `bone` from `from` toward `to`. `gate` is the bone the chain
    /// hangs from; when it is missing from the rig the segment is skipped.
    fn segment(&mut self, bone: &BoneSlot, gate: &BoneSlot, from: Option<Vec3>, to: Option<Vec3>) {
        let (Some(id), Some(_)) = (bone.id, gate.id) else {
            self.report.skip(&bone.name, SkipReason::UnresolvedBone);
            return;
        };
        let (Some(from), Some(to)) = (from, to) else {
            self.report.skip(&bone.name, SkipReason::MissingInput);
            return;
        };

        let parent_world = self.skeleton.parent_world_rotation(id);
        match solve_directional_rotation(parent_world, self.axis, from, to) {
            Ok(target) => {
                let previous = self.skeleton.local_rotation(id);
                self.skeleton
                    .set_local_rotation(id, smooth(previous, target, self.factor));
                self.report.bones_updated += 1;
            }
            Err(reason) => self.report.skip(&bone.name, reason),
        }
    }
}

/// Per-character retargeting state.
///
/// Lifecycle: created with a config, bound to a skeleton (explicitly or on the
/// first tick), ticked once per rendered frame, then torn down.
pub struct Retargeter {
    config: RetargetConfig,
    adapter: CoordinateAdapter,
    axis: Vec3,
    bindings: Option<RigBindings>,
    last_timestamp: Option<f64>,
    torn_down: bool,
    pose_filters: Vec<PointFilter>,
    hand_filters: [Vec<PointFilter>; 2],
}

impl Retargeter {
    pub fn new(config: RetargetConfig) -> Self {
        let axis = math::normalize(Vec3::from_array(config.bone_axis)).unwrap_or_else(|| {
            warn!(
                "Configured bone axis {:?} has no direction, falling back to +Y",
                config.bone_axis
            );
            Vec3::Y
        });
        Self {
            adapter: CoordinateAdapter::new(config.mirror),
            config,
            axis,
            bindings: None,
            last_timestamp: None,
            torn_down: false,
            pose_filters: Vec::new(),
            hand_filters: [Vec::new(), Vec::new()],
        }
    }

    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    pub fn is_bound(&self) -> bool {
        self.bindings.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Resolves the driven bone names against `skeleton`. Returns how many
    /// were found.
    pub fn bind(&mut self, skeleton: &Skeleton) -> usize {
        let bindings = RigBindings::bind(skeleton, &self.config);
        let slots = bindings.slots();
        let missing: Vec<&str> = slots
            .iter()
            .filter(|s| s.id.is_none())
            .map(|s| s.name.as_str())
            .collect();
        let found = slots.len() - missing.len();
        info!("Bound {}/{} rig bones", found, slots.len());
        if !missing.is_empty() {
            debug!("Rig bones not present: {:?}", missing);
        }
        self.bindings = Some(bindings);
        self.torn_down = false;
        found
    }

    /// Releases the rig. Later ticks leave every bone and morph untouched.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.bindings = None;
        self.last_timestamp = None;
        self.reset_filters();
        self.torn_down = true;
        info!("Retargeter torn down");
    }

    /// Runs one retargeting pass of `frame` onto `skeleton` and `meshes`.
    pub fn tick(
        &mut self,
        frame: &FrameInput,
        skeleton: &mut Skeleton,
        meshes: &mut [MorphMesh],
    ) -> FrameReport {
        if self.torn_down {
            return FrameReport::with_state(FrameState::Detached);
        }
        let timestamp = frame.timestamp_ms;
        if !timestamp.is_finite() {
            return FrameReport::with_state(FrameState::Stale);
        }
        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                return FrameReport::with_state(FrameState::Stale);
            }
        }
        let dt = self
            .last_timestamp
            .map(|last| ((timestamp - last) / 1000.0) as f32);
        self.last_timestamp = Some(timestamp);

        if frame.is_empty() {
            self.reset_filters();
            return FrameReport::with_state(FrameState::Idle);
        }

        if self
            .bindings
            .as_ref()
            .map_or(true, |b| !b.matches(skeleton))
        {
            self.bind(skeleton);
        }

        let pose_points = self.prepare_pose(frame, dt);
        let hands = self.prepare_hands(frame, dt);

        let mut report = FrameReport::with_state(FrameState::Active);
        let Some(bindings) = self.bindings.as_ref() else {
            return report;
        };

        if let Some(face) = frame.face.as_ref() {
            self.drive_face(bindings, face, skeleton, meshes, &mut report);
        }

        let mut pass = SolvePass {
            skeleton,
            axis: self.axis,
            factor: self.config.bone_factor(),
            report: &mut report,
        };
        if let Some(points) = pose_points.as_ref() {
            drive_arms(bindings, points, &mut pass);
        }
        for hand in &hands {
            drive_hand(bindings, hand, &mut pass);
        }

        report
    }

    fn drive_face(
        &self,
        bindings: &RigBindings,
        face: &FaceResult,
        skeleton: &mut Skeleton,
        meshes: &mut [MorphMesh],
        report: &mut FrameReport,
    ) {
        if let Some(values) = face.transform.as_ref() {
            self.drive_head(bindings, values, skeleton, report);
        }

        if !face.blendshapes.is_empty() {
            let factor = self.config.expression_factor();
            for mesh in meshes
                .iter_mut()
                .filter(|m| self.config.receives_expressions(m.name()))
            {
                report.morphs_updated += mesh.apply_expression(
                    face.blendshapes.iter().map(|b| (b.name.as_str(), b.score)),
                    factor,
                );
            }
        }
    }

    fn drive_head(
        &self,
        bindings: &RigBindings,
        values: &[f32; 16],
        skeleton: &mut Skeleton,
        report: &mut FrameReport,
    ) {
        let Some(head) = bindings.head.id else {
            report.skip(&bindings.head.name, SkipReason::UnresolvedBone);
            return;
        };
        let Some(rotation) = math::quaternion_from_matrix(values, self.config.face_matrix_layout)
        else {
            report.skip(&bindings.head.name, SkipReason::DegenerateGeometry);
            return;
        };

        let target = self.adapter.rotation_to_engine_space(rotation);
        let previous = skeleton.local_rotation(head);
        let head_local = smooth(previous, target, self.config.head_factor());
        skeleton.set_local_rotation(head, head_local);
        report.bones_updated += 1;

        for (slot, fraction) in [
            (&bindings.neck, self.config.neck_fraction),
            (&bindings.spine, self.config.spine_fraction),
        ] {
            match slot.id {
                Some(id) => {
                    skeleton.set_local_rotation(id, propagate_fraction(head_local, fraction));
                    report.bones_updated += 1;
                }
                None => report.skip(&slot.name, SkipReason::UnresolvedBone),
            }
        }
    }

    fn prepare_pose(&mut self, frame: &FrameInput, dt: Option<f32>) -> Option<Points> {
        let Some(pose) = frame.pose.as_ref().filter(|p| !p.landmarks.is_empty()) else {
            reset_all(&mut self.pose_filters);
            return None;
        };
        let filters = if self.config.landmark_filter.enabled {
            Some(&mut self.pose_filters)
        } else {
            None
        };
        Some(convert_landmarks(
            &self.adapter,
            &self.config,
            &pose.landmarks,
            pose.space,
            filters,
            dt,
        ))
    }

    fn prepare_hands(&mut self, frame: &FrameInput, dt: Option<f32>) -> Vec<PreparedHand> {
        let mut seen = [false; 2];
        let mut prepared = Vec::with_capacity(frame.hands.len());
        for result in frame.hands.iter().filter(|h| !h.landmarks.is_empty()) {
            let side = result.side();
            let filters = match side {
                Some(side) if self.config.landmark_filter.enabled => {
                    seen[side.index()] = true;
                    Some(&mut self.hand_filters[side.index()])
                }
                _ => None,
            };
            let points = convert_landmarks(
                &self.adapter,
                &self.config,
                &result.landmarks,
                result.space,
                filters,
                dt,
            );
            prepared.push(PreparedHand {
                label: result.handedness.clone(),
                side,
                points,
            });
        }
        for side in Side::BOTH {
            if !seen[side.index()] {
                reset_all(&mut self.hand_filters[side.index()]);
            }
        }
        prepared
    }

    fn reset_filters(&mut self) {
        reset_all(&mut self.pose_filters);
        for filters in &mut self.hand_filters {
            reset_all(filters);
        }
    }
}

/// Filters restart from the next sample they see.
fn reset_all(filters: &mut [PointFilter]) {
    filters.iter_mut().for_each(PointFilter::reset);
}

fn convert_landmarks(
    adapter: &CoordinateAdapter,
    config: &RetargetConfig,
    landmarks: &[Landmark],
    space: LandmarkSpace,
    filters: Option<&mut Vec<PointFilter>>,
    dt: Option<f32>,
) -> Points {
    let converted = landmarks
        .iter()
        .map(|lm| adapter.convert(lm, space, config.min_visibility));

    match filters {
        Some(filters) => {
            let settings = &config.landmark_filter;
            if filters.len() < landmarks.len() {
                filters.resize(
                    landmarks.len(),
                    PointFilter::new(settings.min_cutoff, settings.beta),
                );
            }
            converted
                .zip(filters.iter_mut())
                .map(|(p, filter)| p.map(|p| filter.filter(p, dt)))
                .collect()
        }
        None => converted.collect(),
    }
}

fn drive_arms(bindings: &RigBindings, points: &Points, pass: &mut SolvePass<'_>) {
    for side in Side::BOTH {
        let arm = &bindings.arms[side.index()];
        if arm.shoulder.id.is_none() {
            pass.report.skip(&arm.upper_arm.name, SkipReason::UnresolvedBone);
            pass.report.skip(&arm.forearm.name, SkipReason::UnresolvedBone);
            continue;
        }

        let shoulder = point(points, pose::shoulder(side));
        let elbow = point(points, pose::elbow(side));
        let wrist = point(points, pose::wrist(side));

        pass.segment(&arm.upper_arm, &arm.shoulder, shoulder, elbow);
        pass.segment(&arm.forearm, &arm.upper_arm, elbow, wrist);
    }
}

fn drive_hand(bindings: &RigBindings, prepared: &PreparedHand, pass: &mut SolvePass<'_>) {
    let Some(side) = prepared.side else {
        pass.report.skip(
            &format!("Hand[{}]", prepared.label),
            SkipReason::MissingInput,
        );
        return;
    };
    let slots = &bindings.hands[side.index()];
    let forearm = &bindings.arms[side.index()].forearm;
    let p = |index: usize| point(&prepared.points, index);

    pass.segment(&slots.hand, forearm, p(hand::WRIST), p(hand::MIDDLE_MCP));

    for ((_, chain), segments) in hand::FINGERS.iter().zip(slots.fingers.iter()) {
        for k in 0..segments.len() {
            let gate = if k == 0 { &slots.hand } else { &segments[k - 1] };
            pass.segment(&segments[k], gate, p(chain[k]), p(chain[k + 1]));
        }
    }
}
