use std::{
    collections::HashMap,
    ops::{Add, Mul},
};

use gltf::animation::{util::ReadOutputs, Interpolation};

use crate::asset::Node;

pub struct Animator {
    animations: Vec<Animation>,
}

pub struct Animation {
    pub name: Option<String>,
    pub duration: f32,
    channels: Vec<Channel>,
}

struct Channel {
    node: usize,
    interpolation: Interpolation,
    times: Vec<f32>,
    values: Values,
}

enum Values {
    Translations(Vec<glam::Vec3>),
    Rotations(Vec<glam::Quat>),
    Scales(Vec<glam::Vec3>),
}

impl Animator {
    pub(crate) fn from_source(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        node_slots: &HashMap<usize, usize>,
    ) -> Self {
        firestorm::profile_method!(from_source);

        let animations = document
            .animations()
            .map(|animation| {
                let channels = animation
                    .channels()
                    .filter_map(|channel| {
                        let Some(&node) = node_slots.get(&channel.target().node().index()) else {
                            tracing::debug!("Skipping channel targeting a node outside the scene");
                            return None;
                        };
                        let reader = channel.reader(|buffer| {
                            buffers.get(buffer.index()).map(|data| data.0.as_slice())
                        });
                        let times = reader.read_inputs()?.collect::<Vec<_>>();
                        let values = match reader.read_outputs()? {
                            ReadOutputs::Translations(t) => {
                                Values::Translations(t.map(glam::Vec3::from).collect())
                            }
                            ReadOutputs::Rotations(r) => {
                                Values::Rotations(r.into_f32().map(glam::Quat::from_array).collect())
                            }
                            ReadOutputs::Scales(s) => Values::Scales(s.map(glam::Vec3::from).collect()),
                            ReadOutputs::MorphTargetWeights(_) => {
                                tracing::debug!("Skipping unsupported morph target weights channel");
                                return None;
                            }
                        };
                        let channel = Channel {
                            node,
                            interpolation: channel.sampler().interpolation(),
                            times,
                            values,
                        };
                        channel.is_well_formed().then_some(channel)
                    })
                    .collect::<Vec<_>>();

                let duration = channels
                    .iter()
                    .filter_map(|channel| channel.times.last().copied())
                    .fold(0., f32::max);

                Animation {
                    name: animation.name().map(ToOwned::to_owned),
                    duration,
                    channels,
                }
            })
            .collect();

        Self { animations }
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    pub fn animation_duration(&self, index: usize) -> f32 {
        self.animations.get(index).map_or(0., |a| a.duration)
    }

    // Samples the animation at `time` (wrapped to its duration) into the node transforms.
    // Returns false if there was nothing to apply.
    pub(crate) fn apply(&self, index: usize, time: f64, nodes: &mut [Node]) -> bool {
        let Some(animation) = self.animations.get(index) else {
            return false;
        };
        if animation.channels.is_empty() {
            return false;
        }

        let time = if animation.duration > 0. {
            time.rem_euclid(f64::from(animation.duration)) as f32
        } else {
            0.
        };

        for channel in &animation.channels {
            let Some(node) = nodes.get_mut(channel.node) else {
                continue;
            };
            let transform = &mut node.local;
            match &channel.values {
                Values::Translations(values) => {
                    transform.translation = channel.sample(values, time);
                }
                Values::Rotations(values) => {
                    transform.rotation = channel.sample_rotation(values, time);
                }
                Values::Scales(values) => transform.scale = channel.sample(values, time),
            }
        }
        true
    }
}

impl Channel {
    fn is_well_formed(&self) -> bool {
        let keyframes = self.times.len();
        let expected = match self.interpolation {
            Interpolation::CubicSpline => keyframes * 3,
            Interpolation::Linear | Interpolation::Step => keyframes,
        };
        let actual = match &self.values {
            Values::Translations(v) | Values::Scales(v) => v.len(),
            Values::Rotations(v) => v.len(),
        };
        if keyframes == 0 || actual != expected {
            tracing::warn!("Skipping malformed channel ({keyframes} keyframes, {actual} values)");
            return false;
        }
        true
    }

    // (previous keyframe, next keyframe, blend factor)
    fn locate(&self, time: f32) -> (usize, usize, f32) {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return (0, 0, 0.);
        }
        if time >= self.times[last] {
            return (last, last, 0.);
        }
        let next = self.times.partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        (prev, next, (time - self.times[prev]) / span)
    }

    fn sample<T>(&self, values: &[T], time: f32) -> T
    where
        T: Copy + Add<Output = T> + Mul<f32, Output = T> + Lerp,
    {
        let (prev, next, s) = self.locate(time);
        match self.interpolation {
            Interpolation::Step => values[prev],
            Interpolation::Linear => values[prev].lerp_to(values[next], s),
            Interpolation::CubicSpline => {
                // keyframes are stored as (in-tangent, value, out-tangent)
                let dt = self.times[next] - self.times[prev];
                hermite(
                    values[prev * 3 + 1],
                    values[prev * 3 + 2],
                    values[next * 3 + 1],
                    values[next * 3],
                    dt,
                    s,
                )
            }
        }
    }

    fn sample_rotation(&self, values: &[glam::Quat], time: f32) -> glam::Quat {
        self.sample(values, time).normalize()
    }
}

trait Lerp {
    fn lerp_to(self, other: Self, s: f32) -> Self;
}

impl Lerp for glam::Vec3 {
    fn lerp_to(self, other: Self, s: f32) -> Self {
        self.lerp(other, s)
    }
}

impl Lerp for glam::Quat {
    fn lerp_to(self, other: Self, s: f32) -> Self {
        self.slerp(other, s)
    }
}

fn hermite<T>(v0: T, out0: T, v1: T, in1: T, dt: f32, s: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let s2 = s * s;
    let s3 = s2 * s;
    v0 * (2. * s3 - 3. * s2 + 1.)
        + out0 * ((s3 - 2. * s2 + s) * dt)
        + v1 * (-2. * s3 + 3. * s2)
        + in1 * ((s3 - s2) * dt)
}
