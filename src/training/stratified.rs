use ndarray::{ArrayViewMut, ArrayViewMut1, ArrayViewMut2, Axis, Dimension};
use rand::{Rng, seq::SliceRandom};
use rayon::prelude::*;

use super::{
    pass::Pass,
    sgd::{Observation, Step},
};
use crate::model::FactorModel;

/// Runs each epoch as a sequence of strata processed in parallel.
///
/// Students and courses are split into `blocks` contiguous slot ranges. Stratum `t` pairs
/// student block `i` with course block `(i + t) % blocks`, so within a stratum no two
/// tasks touch the same row of `P`, `Q`, `bu` or `bi` and they run without locking.
/// Each block pair keeps its own bucket of ratings, visited sequentially in shuffled order.
pub(crate) struct StratifiedPass {
    blocks: usize,
    student_bounds: Vec<usize>,
    course_bounds: Vec<usize>,
    buckets: Vec<Vec<Observation>>,
}

impl StratifiedPass {
    /// Creates a new `StratifiedPass`.
    ///
    /// The amount of blocks is capped by the amount of students and courses, every block
    /// holds at least one slot on each side.
    ///
    /// # Arguments
    /// * `observations` - The resolved ratings.
    /// * `num_students` - The amount of student slots of the model.
    /// * `num_courses` - The amount of course slots of the model.
    /// * `blocks` - The requested amount of blocks per side.
    pub fn new(
        observations: &[Observation],
        num_students: usize,
        num_courses: usize,
        blocks: usize,
    ) -> Self {
        let blocks = blocks.min(num_students).min(num_courses).max(1);
        let student_bounds = bounds(num_students, blocks);
        let course_bounds = bounds(num_courses, blocks);

        let mut buckets = vec![Vec::new(); blocks * blocks];
        for &o in observations {
            let i = block_of(o.s, &student_bounds);
            let j = block_of(o.c, &course_bounds);
            buckets[i * blocks + j].push(o);
        }

        Self {
            blocks,
            student_bounds,
            course_bounds,
            buckets,
        }
    }
}

impl Pass for StratifiedPass {
    fn run_epoch<R: Rng>(&mut self, model: &mut FactorModel, lr: f32, lambda: f32, rng: &mut R) {
        let b = self.blocks;

        for bucket in &mut self.buckets {
            bucket.shuffle(rng);
        }

        let mut strata: Vec<usize> = (0..b).collect();
        strata.shuffle(rng);

        let step = Step {
            mu: model.mu,
            lr,
            lambda,
        };

        for t in strata {
            let students = split(model.p.view_mut(), &self.student_bounds)
                .into_iter()
                .zip(split(model.bu.view_mut(), &self.student_bounds));

            let mut courses: Vec<_> = split(model.q.view_mut(), &self.course_bounds)
                .into_iter()
                .zip(split(model.bi.view_mut(), &self.course_bounds))
                .collect();
            courses.rotate_left(t);

            let tasks: Vec<_> = students
                .zip(courses)
                .enumerate()
                .map(|(i, ((p, bu), (q, bi)))| {
                    let j = (i + t) % b;
                    Block {
                        p,
                        bu,
                        q,
                        bi,
                        s0: self.student_bounds[i],
                        c0: self.course_bounds[j],
                        ratings: &self.buckets[i * b + j],
                    }
                })
                .collect();

            tasks.into_par_iter().for_each(|block| block.run(step));
        }
    }
}

/// The disjoint slice of the model one parallel task owns during a stratum.
struct Block<'a> {
    p: ArrayViewMut2<'a, f32>,
    bu: ArrayViewMut1<'a, f32>,
    q: ArrayViewMut2<'a, f32>,
    bi: ArrayViewMut1<'a, f32>,
    s0: usize,
    c0: usize,
    ratings: &'a [Observation],
}

impl Block<'_> {
    fn run(mut self, step: Step) {
        for &Observation { s, c, r } in self.ratings {
            let (s, c) = (s - self.s0, c - self.c0);
            step.apply(
                r,
                self.p.row_mut(s),
                self.q.row_mut(c),
                &mut self.bu[s],
                &mut self.bi[c],
            );
        }
    }
}

/// Splits `0..n` into `blocks` balanced contiguous ranges, returned as `blocks + 1` bounds.
fn bounds(n: usize, blocks: usize) -> Vec<usize> {
    (0..=blocks).map(|i| i * n / blocks).collect()
}

fn block_of(slot: usize, bounds: &[usize]) -> usize {
    bounds.partition_point(|&b| b <= slot) - 1
}

/// Splits a view along its first axis following `bounds`.
fn split<'a, D: Dimension>(
    mut view: ArrayViewMut<'a, f32, D>,
    bounds: &[usize],
) -> Vec<ArrayViewMut<'a, f32, D>> {
    let mut parts = Vec::with_capacity(bounds.len().saturating_sub(1));

    for w in bounds.windows(2) {
        let (head, tail) = view.split_at(Axis(0), w[1] - w[0]);
        parts.push(head);
        view = tail;
    }

    parts
}
