//! Critical Path Method (potential-task network)
//!
//! Tasks become nodes of a DAG between synthetic `Start` and `End` nodes:
//! tasks without predecessors hang off `Start`, tasks without successors feed
//! `End`. A forward pass in topological order gives earliest starts, a
//! backward pass from `End` gives latest starts, and every node whose slack
//! is zero lies on the critical path.
//!
//! Topological order comes from Kahn's algorithm with a FIFO queue, seeded in
//! node order and releasing successors in the order their dependencies were
//! declared, so schedules are reproducible for a fixed input order.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError};

pub type TaskId = u32;
pub type Duration = u64;

/// Unit of work with the tasks that must finish before it can start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub duration: Duration,
    pub predecessors: Vec<TaskId>,
}

impl Task {
    pub fn new(id: TaskId, duration: Duration, predecessors: &[TaskId]) -> Self {
        Self {
            id,
            duration,
            predecessors: predecessors.to_vec(),
        }
    }
}

/// Node of the scheduling network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleNode {
    Start,
    Task(TaskId),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub node: ScheduleNode,
    pub duration: Duration,
    pub earliest_start: Duration,
    pub latest_start: Duration,
    /// `latest_start - earliest_start`
    pub slack: Duration,
}

impl ScheduleEntry {
    pub fn earliest_finish(&self) -> Duration {
        self.earliest_start + self.duration
    }

    pub fn latest_finish(&self) -> Duration {
        self.latest_start + self.duration
    }

    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Earliest/latest dates for every node, in topological order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    /// Zero-slack nodes in topological order, `Start` and `End` included
    pub critical_path: Vec<ScheduleNode>,
    /// Earliest start of `End`
    pub project_duration: Duration,
}

impl Schedule {
    pub fn entry(&self, node: ScheduleNode) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.node == node)
    }

    pub fn task(&self, id: TaskId) -> Option<&ScheduleEntry> {
        self.entry(ScheduleNode::Task(id))
    }

    /// Critical tasks without the synthetic endpoints
    pub fn critical_tasks(&self) -> Vec<TaskId> {
        self.critical_path
            .iter()
            .filter_map(|node| match node {
                ScheduleNode::Task(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

/// Critical Path Method scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalPathMethod;

impl CriticalPathMethod {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, tasks: &[Task]) -> Result<Schedule, AlgorithmError> {
        let n = tasks.len();
        // Node 0 is Start, 1..=n the tasks in input order, n + 1 is End
        let end = n + 1;
        let node_of = index_tasks(tasks)?;

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n + 2];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n + 2];
        for (i, task) in tasks.iter().enumerate() {
            for dependency in &task.predecessors {
                let p = *node_of
                    .get(dependency)
                    .ok_or(AlgorithmError::UnknownDependency {
                        task: task.id,
                        dependency: *dependency,
                    })?;
                successors[p].push(i + 1);
                predecessors[i + 1].push(p);
            }
        }
        for v in 1..=n {
            if predecessors[v].is_empty() {
                successors[0].push(v);
                predecessors[v].push(0);
            }
        }
        for v in 1..=n {
            if successors[v].is_empty() {
                successors[v].push(end);
                predecessors[end].push(v);
            }
        }
        if n == 0 {
            successors[0].push(end);
            predecessors[end].push(0);
        }

        let order = topological_order(&successors, &predecessors);
        if order.len() < n + 2 {
            let ordered: HashSet<usize> = order.iter().copied().collect();
            let stuck: Vec<TaskId> = (1..=n)
                .filter(|v| !ordered.contains(v))
                .map(|v| tasks[v - 1].id)
                .collect();
            debug!("critical path: dependency cycle among {:?}", stuck);
            return Err(AlgorithmError::CyclicDependency(stuck));
        }

        let duration = |v: usize| if v == 0 || v == end { 0 } else { tasks[v - 1].duration };

        // Forward pass
        let mut earliest = vec![0 as Duration; n + 2];
        for &v in &order {
            earliest[v] = predecessors[v]
                .iter()
                .map(|&p| earliest[p] + duration(p))
                .max()
                .unwrap_or(0);
        }

        // Backward pass
        let mut latest = vec![0 as Duration; n + 2];
        for &v in order.iter().rev() {
            latest[v] = successors[v]
                .iter()
                .map(|&s| latest[s].saturating_sub(duration(v)))
                .min()
                .unwrap_or(earliest[v]);
        }

        let node = |v: usize| match v {
            0 => ScheduleNode::Start,
            v if v == end => ScheduleNode::End,
            v => ScheduleNode::Task(tasks[v - 1].id),
        };

        let entries: Vec<ScheduleEntry> = order
            .iter()
            .map(|&v| {
                let entry = ScheduleEntry {
                    node: node(v),
                    duration: duration(v),
                    earliest_start: earliest[v],
                    latest_start: latest[v],
                    slack: latest[v].saturating_sub(earliest[v]),
                };
                trace!(
                    "critical path: {:?} ES={} LS={} slack={}",
                    entry.node,
                    entry.earliest_start,
                    entry.latest_start,
                    entry.slack
                );
                entry
            })
            .collect();

        let critical_path = entries
            .iter()
            .filter(|entry| entry.is_critical())
            .map(|entry| entry.node)
            .collect();

        let project_duration = earliest[end];
        debug!("critical path: {} tasks, project duration {}", n, project_duration);
        Ok(Schedule {
            entries,
            critical_path,
            project_duration,
        })
    }
}

/// Maps each task id to its node index, rejecting repeated ids
fn index_tasks(tasks: &[Task]) -> Result<HashMap<TaskId, usize>, AlgorithmError> {
    let mut node_of = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if node_of.insert(task.id, i + 1).is_some() {
            return Err(AlgorithmError::DuplicateTask(task.id));
        }
    }
    Ok(node_of)
}

/// Kahn's algorithm; returns fewer nodes than the graph holds when it is cyclic
fn topological_order(successors: &[Vec<usize>], predecessors: &[Vec<usize>]) -> Vec<usize> {
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..in_degree.len()).filter(|&v| in_degree[v] == 0).collect();
    let mut order = Vec::with_capacity(in_degree.len());

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &s in &successors[v] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                queue.push_back(s);
            }
        }
    }
    order
}

/// Runs [`CriticalPathMethod`]
pub fn critical_path(tasks: &[Task]) -> Result<Schedule, AlgorithmError> {
    CriticalPathMethod::new().run(tasks)
}

impl Algorithm for CriticalPathMethod {
    fn name(&self) -> &'static str {
        "Critical Path Method"
    }

    fn category(&self) -> &'static str {
        "scheduling"
    }

    fn description(&self) -> String {
        "Earliest and latest start dates, slack and the critical path of a task network \
         with precedence constraints."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::uniform("O(V + E)", "O(V + E)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{init_logging, seeded_rng};
    use rand::Rng;

    /// Longest chain of durations ending at each task, by plain recursion
    fn longest_finish(tasks: &[Task], id: TaskId) -> Duration {
        let task = tasks.iter().find(|t| t.id == id).unwrap();
        task.duration
            + task
                .predecessors
                .iter()
                .map(|&p| longest_finish(tasks, p))
                .max()
                .unwrap_or(0)
    }

    fn random_tasks<R: Rng>(rng: &mut R, count: u32) -> Vec<Task> {
        (1..=count)
            .map(|id| {
                let predecessors = (1..id).filter(|_| rng.gen_bool(0.3)).collect::<Vec<_>>();
                Task::new(id, rng.gen_range(1..=10), &predecessors)
            })
            .collect()
    }

    #[test]
    fn test_two_task_chain() {
        init_logging();
        let schedule = critical_path(&[Task::new(1, 3, &[]), Task::new(2, 2, &[1])]).unwrap();

        assert_eq!(schedule.project_duration, 5);
        assert_eq!(schedule.entry(ScheduleNode::End).unwrap().earliest_start, 5);
        assert_eq!(
            schedule.critical_path,
            vec![ScheduleNode::Start, ScheduleNode::Task(1), ScheduleNode::Task(2), ScheduleNode::End]
        );
        assert_eq!(schedule.task(2).unwrap().earliest_start, 3);
        assert_eq!(schedule.task(2).unwrap().latest_finish(), 5);
    }

    #[test]
    fn test_parallel_branches_have_slack() {
        let tasks = [Task::new(1, 3, &[]), Task::new(2, 5, &[]), Task::new(3, 2, &[1, 2])];
        let schedule = critical_path(&tasks).unwrap();

        assert_eq!(schedule.project_duration, 7);
        let first = schedule.task(1).unwrap();
        assert_eq!((first.earliest_start, first.latest_start, first.slack), (0, 2, 2));
        assert_eq!(first.earliest_finish(), 3);
        assert_eq!(schedule.critical_tasks(), vec![2, 3]);
        assert_eq!(schedule.entries.first().unwrap().node, ScheduleNode::Start);
        assert_eq!(schedule.entries.last().unwrap().node, ScheduleNode::End);
    }

    #[test]
    fn test_empty_project() {
        let schedule = critical_path(&[]).unwrap();
        assert_eq!(schedule.project_duration, 0);
        assert_eq!(schedule.critical_path, vec![ScheduleNode::Start, ScheduleNode::End]);
    }

    #[test]
    fn test_invalid_task_lists() {
        assert_eq!(
            critical_path(&[Task::new(1, 1, &[]), Task::new(1, 2, &[])]).unwrap_err(),
            AlgorithmError::DuplicateTask(1)
        );
        assert_eq!(
            critical_path(&[Task::new(1, 1, &[9])]).unwrap_err(),
            AlgorithmError::UnknownDependency { task: 1, dependency: 9 }
        );
        assert_eq!(
            critical_path(&[Task::new(1, 1, &[]), Task::new(2, 1, &[3]), Task::new(3, 1, &[2])]).unwrap_err(),
            AlgorithmError::CyclicDependency(vec![2, 3])
        );
        assert_eq!(
            critical_path(&[Task::new(4, 1, &[4])]).unwrap_err(),
            AlgorithmError::CyclicDependency(vec![4])
        );
    }

    #[test]
    fn test_random_networks() {
        let mut rng = seeded_rng(8);
        for _ in 0..30 {
            let tasks = random_tasks(&mut rng, 9);
            let schedule = critical_path(&tasks).unwrap();

            let longest = tasks.iter().map(|t| longest_finish(&tasks, t.id)).max().unwrap_or(0);
            assert_eq!(schedule.project_duration, longest);
            for entry in &schedule.entries {
                assert!(entry.earliest_start <= entry.latest_start);
                assert!(entry.latest_finish() <= schedule.project_duration);
            }
            assert_eq!(schedule.critical_path.first(), Some(&ScheduleNode::Start));
            assert_eq!(schedule.critical_path.last(), Some(&ScheduleNode::End));
        }
    }

    #[test]
    fn test_perturbing_a_duration() {
        let mut rng = seeded_rng(21);
        for _ in 0..30 {
            let mut tasks = random_tasks(&mut rng, 8);
            let schedule = critical_path(&tasks).unwrap();

            // Critical tasks lengthen the project one for one
            let critical = schedule.critical_tasks()[0];
            let index = tasks.iter().position(|t| t.id == critical).unwrap();
            tasks[index].duration += 1;
            let longer = critical_path(&tasks).unwrap();
            assert_eq!(longer.project_duration, schedule.project_duration + 1);
            assert!(longer.task(critical).unwrap().is_critical());
            tasks[index].duration -= 1;

            // Slack absorbs a non-critical delay; one unit more makes the task critical
            if let Some(entry) = schedule.entries.iter().find(|e| e.slack > 0) {
                let ScheduleNode::Task(id) = entry.node else { continue };
                let index = tasks.iter().position(|t| t.id == id).unwrap();

                tasks[index].duration += entry.slack;
                let absorbed = critical_path(&tasks).unwrap();
                assert_eq!(absorbed.project_duration, schedule.project_duration);
                assert!(absorbed.task(id).unwrap().is_critical());

                tasks[index].duration += 1;
                let delayed = critical_path(&tasks).unwrap();
                assert_eq!(delayed.project_duration, schedule.project_duration + 1);
            }
        }
    }
}
