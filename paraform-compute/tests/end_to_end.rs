use paraform_compute::{
    equiv::{assoc_generate, dist_generate},
    parallel::parallel_form,
    schedule::{build_tasks, schedule, CostTable, Machine, Task, TaskRun},
    search::{beam_search, exhaustive, neighbors, SearchOptions},
};
use paraform_parser::parser::{ast::{Node, Op}, parse_expression};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const SOURCE: &str = "(A+B)*(C+D+E)+F*(G+H)";

fn base() -> Node {
    parallel_form(&parse_expression(SOURCE).unwrap())
}

fn task(id: usize, op: Op, duration: u64, deps: &[usize]) -> Task {
    Task { id, op, duration, deps: deps.to_vec() }
}

fn run(task_id: usize, op: Op, processor: usize, start: u64, finish: u64) -> TaskRun {
    TaskRun { task_id, op, processor, start, finish }
}

/// Checks that the runs of a schedule respect dependencies, processors, and memory banks.
fn assert_feasible(tasks: &[Task], runs: &[TaskRun], machine: &Machine) {
    let by_id = runs.iter().map(|run| (run.task_id, run)).collect::<HashMap<_, _>>();
    assert_eq!(by_id.len(), tasks.len());

    for task in tasks {
        let run = by_id[&task.id];
        assert_eq!(run.finish - run.start, task.duration);
        assert!(run.start >= machine.mem_cost());
        for dependency in &task.deps {
            assert!(by_id[dependency].finish <= run.start - machine.mem_cost());
        }
    }

    for (i, a) in runs.iter().enumerate() {
        for b in &runs[i + 1..] {
            if a.processor == b.processor {
                let busy_a = a.start - machine.mem_cost()..a.finish;
                let busy_b = b.start - machine.mem_cost()..b.finish;
                assert!(busy_a.end <= busy_b.start || busy_b.end <= busy_a.start, "{:?} and {:?} overlap", a, b);
            }
        }
    }

    // with one bank, memory accesses never overlap
    if machine.memory_banks() == 1 && machine.mem_cost() > 0 {
        let mut accesses = runs.iter().map(|run| run.start - machine.mem_cost()).collect::<Vec<_>>();
        accesses.sort_unstable();
        for pair in accesses.windows(2) {
            assert!(pair[1] >= pair[0] + machine.mem_cost());
        }
    }
}

#[test]
fn normalizes_reference_expression() {
    assert_eq!(base().to_string(), "(((A+B)*((C+D)+E))+(F*(G+H)))");
}

#[test]
fn builds_reference_tasks() {
    let graph = build_tasks(&base(), &CostTable::default()).unwrap();
    assert_eq!(graph.tasks, vec![
        task(1, Op::Add, 1, &[]),
        task(2, Op::Add, 1, &[]),
        task(3, Op::Add, 1, &[2]),
        task(4, Op::Mul, 2, &[1, 3]),
        task(5, Op::Add, 1, &[]),
        task(6, Op::Mul, 2, &[5]),
        task(7, Op::Add, 1, &[4, 6]),
    ]);
    assert_eq!(graph.root, 7);
    assert_eq!(graph.sequential_time().unwrap(), 9);
}

#[test]
fn schedules_reference_tasks() {
    let graph = build_tasks(&base(), &CostTable::default()).unwrap();
    let machine = Machine::new(2, 1, 1).unwrap();
    let schedule = schedule(&graph.tasks, &machine).unwrap();

    assert_eq!(schedule.makespan, 10);
    assert_eq!(schedule.runs, vec![
        run(1, Op::Add, 0, 1, 2),
        run(2, Op::Add, 1, 2, 3),
        run(5, Op::Add, 0, 3, 4),
        run(3, Op::Add, 1, 4, 5),
        run(6, Op::Mul, 0, 5, 7),
        run(4, Op::Mul, 1, 6, 8),
        run(7, Op::Add, 0, 9, 10),
    ]);

    let root = schedule.runs.iter().find(|run| run.task_id == graph.root).unwrap();
    assert_eq!(root.finish, schedule.makespan);
    assert_feasible(&graph.tasks, &schedule.runs, &machine);
}

#[test]
fn schedules_are_feasible() {
    let machines = [(1, 1, 0), (2, 1, 1), (3, 2, 1), (4, 1, 2), (8, 8, 3)];
    for source in [SOURCE, "a-b-c-d-e", "a/b/c*(d+e+f)", "x*y+x*z-(p+q)*r"] {
        let form = parallel_form(&parse_expression(source).unwrap());
        let graph = build_tasks(&form, &CostTable::default()).unwrap();
        for (p, m, mem) in machines {
            let machine = Machine::new(p, m, mem).unwrap();
            let schedule = schedule(&graph.tasks, &machine).unwrap();
            assert_feasible(&graph.tasks, &schedule.runs, &machine);
            assert!(schedule.makespan >= graph.sequential_time().unwrap() / p as u64);
        }
    }
}

#[test]
fn one_processor_without_memory_is_sequential() {
    let graph = build_tasks(&base(), &CostTable::default()).unwrap();
    let schedule = schedule(&graph.tasks, &Machine::new(1, 1, 0).unwrap()).unwrap();
    assert_eq!(schedule.makespan, graph.sequential_time().unwrap());
}

#[test]
fn scheduling_is_deterministic() {
    let graph = build_tasks(&base(), &CostTable::default()).unwrap();
    let machine = Machine::new(3, 2, 1).unwrap();
    let first = schedule(&graph.tasks, &machine).unwrap();
    for _ in 0..5 {
        assert_eq!(schedule(&graph.tasks, &machine).unwrap(), first);
    }
}

#[test]
fn single_leaf_has_nothing_to_schedule() {
    let graph = build_tasks(&Node::leaf("A"), &CostTable::default()).unwrap();
    assert!(graph.tasks.is_empty());
    assert_eq!(graph.root, 0);

    let schedule = schedule(&graph.tasks, &Machine::new(2, 1, 1).unwrap()).unwrap();
    assert_eq!(schedule.makespan, 0);
    assert!(schedule.runs.is_empty());
}

#[test]
fn single_operation() {
    let graph = build_tasks(&parse_expression("A*B").unwrap(), &CostTable::default()).unwrap();
    let schedule = schedule(&graph.tasks, &Machine::new(4, 2, 1).unwrap()).unwrap();
    assert_eq!(schedule.makespan, 3);
    assert_eq!(schedule.runs, vec![run(1, Op::Mul, 0, 1, 3)]);
}

#[test]
fn regrouping_cap() {
    let forms = assoc_generate(&parse_expression("A+B+C+D+E").unwrap(), 7);
    assert_eq!(forms.len(), 7);
}

#[test]
fn generated_forms_are_distinct() {
    let base = base();
    let mut forms = assoc_generate(&base, 60)
        .into_iter()
        .chain(dist_generate(&base, 60, 4))
        .map(|form| form.to_string())
        .collect::<Vec<_>>();
    assert_eq!(forms.len(), 2 + 42);
    forms.sort();
    forms.dedup();

    // the base tree is the only form both generators produce
    assert_eq!(forms.len(), 43);
}

#[test]
fn reference_neighbors() {
    let rendered = neighbors(&base(), 6, 6)
        .iter()
        .map(Node::to_string)
        .collect::<Vec<_>>();
    assert_eq!(rendered, vec![
        "(((A+B)*(C+(D+E)))+(F*(G+H)))",
        "((((A+B)*(C+D))+((A+B)*E))+(F*(G+H)))",
        "(((A*((C+D)+E))+(B*((C+D)+E)))+(F*(G+H)))",
        "(((A+B)*((C+D)+E))+((F*G)+(F*H)))",
    ]);
}

#[test]
fn exhaustive_search() {
    let ranking = exhaustive(&base(), &SearchOptions::default()).unwrap();
    assert_eq!(ranking.candidates.len(), 43);

    let best = ranking.best().unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.rendering, "(((A+B)*((C+D)+E))+(F*(G+H)))");
    assert_eq!((best.metrics.makespan, best.metrics.sequential, best.metrics.tasks), (10, 9, 7));
    assert_eq!(best.metrics.efficiency, 0.45);

    assert_eq!(ranking.candidates[1].rendering, "(((A+B)*(C+(D+E)))+(F*(G+H)))");
    let worst = ranking.candidates.last().unwrap();
    assert_eq!(worst.metrics.makespan, 21);
}

#[test]
fn beam_search_matches_exhaustive_best() {
    let options = SearchOptions::default();
    let found = beam_search(&base(), &options).unwrap();
    assert_eq!(found.len(), options.top_k);

    let renderings = found.iter().map(|candidate| candidate.rendering.as_str()).collect::<Vec<_>>();
    assert_eq!(&renderings[..4], &[
        "(((A+B)*((C+D)+E))+(F*(G+H)))",
        "(((A+B)*(C+(D+E)))+(F*(G+H)))",
        "((((A+B)*((C+D)+E))+(F*G))+(F*H))",
        "((((A+B)*(C+(D+E)))+(F*G))+(F*H))",
    ]);
    assert_eq!(found[2].metrics.makespan, 12);
}

#[test]
fn searches_are_deterministic() {
    let options = SearchOptions::default();
    assert_eq!(beam_search(&base(), &options).unwrap(), beam_search(&base(), &options).unwrap());
    assert_eq!(exhaustive(&base(), &options).unwrap(), exhaustive(&base(), &options).unwrap());
}
