//! Reports printed by each subcommand, as text or as JSON.

use paraform_compute::{
    parallel::Step,
    schedule::{CostTable, Machine, Task, TaskRun},
    search::{Candidate, Metrics},
};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// The widest schedule drawn as a chart, in time units.
const MAX_CHART_WIDTH: u64 = 120;

fn write_costs(f: &mut Formatter<'_>, costs: &CostTable) -> fmt::Result {
    let costs = costs.iter()
        .map(|(op, cost)| format!("{} = {}", op, cost))
        .collect::<Vec<_>>();
    writeln!(f, "Operation costs: {}", costs.join(", "))
}

fn write_machine(f: &mut Formatter<'_>, machine: &Machine, costs: &CostTable) -> fmt::Result {
    writeln!(f, "System: dataflow")?;
    writeln!(f, "Processors (P): {}", machine.processors())?;
    writeln!(f, "Memory banks: {}", machine.memory_banks())?;
    writeln!(f, "Memory access cost: {}", machine.mem_cost())?;
    write_costs(f, costs)
}

fn write_metrics(f: &mut Formatter<'_>, metrics: &Metrics) -> fmt::Result {
    writeln!(f, "T1 (sequential): {}", metrics.sequential)?;
    writeln!(f, "Tp (parallel):   {}", metrics.makespan)?;
    writeln!(f, "S = T1/Tp:       {:.4}", metrics.speedup)?;
    writeln!(f, "E = S/P:         {:.4}", metrics.efficiency)
}

fn write_candidates(f: &mut Formatter<'_>, candidates: &[Candidate]) -> fmt::Result {
    writeln!(f, "idx |  Tp |  T1 |      S |      E | ops | form")?;
    writeln!(f, "---:|----:|----:|-------:|-------:|----:|:-----")?;
    for candidate in candidates {
        let metrics = &candidate.metrics;
        writeln!(
            f,
            "{:>3} | {:>3} | {:>3} | {:>6.3} | {:>6.3} | {:>3} | {}",
            candidate.index,
            metrics.makespan,
            metrics.sequential,
            metrics.speedup,
            metrics.efficiency,
            metrics.tasks,
            candidate.rendering,
        )?;
    }
    Ok(())
}

/// Output of `paraform normalize`.
#[derive(Debug, Serialize)]
pub struct NormalizeReport<'a> {
    pub input: &'a str,
    pub parallel_form: String,
    pub depth_before: usize,
    pub depth_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl Display for NormalizeReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input: {}", self.input)?;
        writeln!(f, "Parallel form: {}", self.parallel_form)?;
        writeln!(f, "Height: {} -> {}", self.depth_before, self.depth_after)?;
        if let Some(steps) = &self.steps {
            writeln!(f, "Rewrites:")?;
            for step in steps {
                let description = match step {
                    Step::DivisionChain => "division chain: a/b/c = a/(b*c)",
                    Step::SubtractionChain => "subtraction chain: a-b-c = a-(b+c)",
                    Step::Rebalance => "rebalanced chain of + or *",
                };
                writeln!(f, "  {}", description)?;
            }
        }
        Ok(())
    }
}

/// Output of `paraform assoc` and `paraform dist`.
#[derive(Debug, Serialize)]
pub struct FormsReport<'a> {
    pub input: &'a str,
    pub base: String,
    pub forms: Vec<String>,
}

impl Display for FormsReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input: {}", self.input)?;
        writeln!(f, "Base form: {}", self.base)?;
        writeln!(f, "Forms found: {}", self.forms.len())?;
        for (i, form) in self.forms.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, form)?;
        }
        Ok(())
    }
}

/// Output of `paraform schedule`.
#[derive(Debug, Serialize)]
pub struct ScheduleReport<'a> {
    pub input: &'a str,
    pub parallel_form: String,
    pub machine: Machine,
    pub costs: &'a CostTable,
    pub root: usize,
    pub tasks: Vec<Task>,
    pub metrics: Metrics,
    pub runs: Vec<TaskRun>,
}

impl ScheduleReport<'_> {
    /// Draws one row per processor, one column per time unit. Memory accesses are drawn as `~`,
    /// computation as the operator of the task, and idle time as `.`.
    fn write_chart(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let makespan = self.metrics.makespan;
        if makespan == 0 || makespan > MAX_CHART_WIDTH {
            return Ok(());
        }

        let mem_cost = self.machine.mem_cost();
        for processor in 0..self.machine.processors() {
            let mut row = vec!['.'; makespan as usize];
            for run in self.runs.iter().filter(|run| run.processor == processor) {
                for time in run.start.saturating_sub(mem_cost)..run.start {
                    row[time as usize] = '~';
                }
                for time in run.start..run.finish {
                    row[time as usize] = run.op.symbol();
                }
            }
            writeln!(f, "P{:<3}|{}|", processor, row.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}

impl Display for ScheduleReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_machine(f, &self.machine, self.costs)?;
        writeln!(f)?;
        writeln!(f, "Input: {}", self.input)?;
        writeln!(f, "Parallel form: {}", self.parallel_form)?;
        writeln!(f, "Root task: t{}", self.root)?;
        writeln!(f, "Tasks count: {}", self.tasks.len())?;
        writeln!(f)?;
        write_metrics(f, &self.metrics)?;
        writeln!(f)?;

        let mut runs = self.runs.iter().collect::<Vec<_>>();
        runs.sort_by_key(|run| (run.start, run.finish, run.processor, run.task_id));
        writeln!(f, "t_start | t_end | proc | task | op")?;
        writeln!(f, "------:|-----:|:-----|:-----|:--")?;
        for run in runs {
            writeln!(
                f,
                "{:>6} | {:>5} | P{:>3} | t{:>4} | {}",
                run.start,
                run.finish,
                run.processor,
                run.task_id,
                run.op,
            )?;
        }
        writeln!(f)?;
        self.write_chart(f)
    }
}

/// Output of `paraform search`.
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub input: &'a str,
    pub base: String,
    pub machine: Machine,
    pub costs: &'a CostTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhaustive: Option<Vec<Candidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beam: Option<Vec<Candidate>>,
}

impl Display for SearchReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_machine(f, &self.machine, self.costs)?;
        writeln!(f)?;
        writeln!(f, "Input: {}", self.input)?;
        writeln!(f, "Base form: {}", self.base)?;

        if let Some(candidates) = &self.exhaustive {
            writeln!(f)?;
            writeln!(f, "All equivalent forms ({})", candidates.len())?;
            write_candidates(f, candidates)?;

            if let Some(best) = candidates.first() {
                let metrics = &best.metrics;
                writeln!(f)?;
                writeln!(f, "Optimal form:")?;
                writeln!(
                    f,
                    "idx={}, Tp={}, T1={}, S={:.4}, E={:.4}, ops={}",
                    best.index,
                    metrics.makespan,
                    metrics.sequential,
                    metrics.speedup,
                    metrics.efficiency,
                    metrics.tasks,
                )?;
                writeln!(f, "{}", best.rendering)?;
            }
        }

        if let Some(candidates) = &self.beam {
            writeln!(f)?;
            writeln!(f, "Beam search (top {})", candidates.len())?;
            write_candidates(f, candidates)?;
        }
        Ok(())
    }
}
