use crate::generator::{expand_wordlist, Candidate};
use crate::resolver::{ForwardResolve, ReverseResolve};
use crate::types::{Config, EnumerationReport, EnumerationStats, Record};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Generating,
    Resolving,
    Done,
}

/// Run-scoped settings for one enumeration.
#[derive(Debug, Clone)]
pub struct EnumerationSettings {
    pub domain: String,
    pub numeric_variants: bool,
    pub reverse_lookup: bool,
    pub workers: usize,
    pub run_timeout: Option<Duration>,
    pub show_progress: bool,
}

impl EnumerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            domain: config.domain.clone(),
            numeric_variants: config.numeric_variants,
            reverse_lookup: config.reverse_lookup,
            workers: config.resolver.threads,
            run_timeout: config.run_timeout,
            show_progress: !config.output.silent && atty::is(atty::Stream::Stderr),
        }
    }
}

enum CandidateOutcome {
    Found(Vec<Record>),
    Absent,
    Failed,
}

pub struct Enumerator {
    settings: EnumerationSettings,
    forward: Arc<dyn ForwardResolve>,
    reverse: Arc<dyn ReverseResolve>,
    phase: RunPhase,
}

impl Enumerator {
    pub fn new(
        settings: EnumerationSettings,
        forward: Arc<dyn ForwardResolve>,
        reverse: Arc<dyn ReverseResolve>,
    ) -> Self {
        Self {
            settings,
            forward,
            reverse,
            phase: RunPhase::Init,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!("Enumeration phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Probes every candidate derived from `labels`. Per-candidate failures
    /// are contained, so this always produces a report.
    pub async fn run(&mut self, labels: &[String]) -> EnumerationReport {
        let start_time = Instant::now();
        self.enter(RunPhase::Init);

        self.enter(RunPhase::Generating);
        let candidates = expand_wordlist(&self.settings.domain, labels, self.settings.numeric_variants);
        info!(
            "Generated {} candidates from {} labels for {}",
            candidates.len(),
            labels.len(),
            self.settings.domain
        );

        self.enter(RunPhase::Resolving);
        let (outcomes, timed_out) = self.resolve_all(&candidates).await;

        let mut stats = EnumerationStats {
            candidates: candidates.len(),
            timed_out,
            ..EnumerationStats::default()
        };
        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                Some(CandidateOutcome::Found(found)) => {
                    stats.resolved += 1;
                    records.extend(found);
                }
                Some(CandidateOutcome::Absent) => stats.absent += 1,
                Some(CandidateOutcome::Failed) => stats.failed += 1,
                None => stats.unfinished += 1,
            }
        }
        stats.records = records.len();
        stats.duration = start_time.elapsed();

        self.enter(RunPhase::Done);

        EnumerationReport {
            domain: self.settings.domain.clone(),
            records,
            stats,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Drains candidates through a bounded pool. Outcomes land in their
    /// candidate's slot so the final order never depends on completion order.
    async fn resolve_all(&self, candidates: &[Candidate]) -> (Vec<Option<CandidateOutcome>>, bool) {
        let mut outcomes: Vec<Option<CandidateOutcome>> = Vec::with_capacity(candidates.len());
        outcomes.resize_with(candidates.len(), || None);

        let progress = self.progress_bar(candidates.len());
        let semaphore = Arc::new(Semaphore::new(self.settings.workers.max(1)));
        let mut futures = FuturesUnordered::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            let semaphore = semaphore.clone();
            let forward = self.forward.clone();
            let reverse = self.reverse.clone();
            let reverse_enabled = self.settings.reverse_lookup;

            futures.push(async move {
                let outcome = match semaphore.acquire().await {
                    Ok(_permit) => probe_candidate(candidate, forward.as_ref(), reverse.as_ref(), reverse_enabled).await,
                    Err(e) => {
                        warn!("{}: worker pool unavailable: {}", candidate, e);
                        CandidateOutcome::Failed
                    }
                };
                (idx, outcome)
            });
        }

        let deadline = self.settings.run_timeout.map(|timeout| Instant::now() + timeout);
        let mut timed_out = false;

        loop {
            let next = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, futures.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        timed_out = true;
                        break;
                    }
                },
                None => futures.next().await,
            };

            match next {
                Some((idx, outcome)) => {
                    outcomes[idx] = Some(outcome);
                    progress.inc(1);
                }
                None => break,
            }
        }

        progress.finish_and_clear();
        if timed_out {
            warn!(
                "Run deadline reached with {} of {} candidates unfinished",
                outcomes.iter().filter(|o| o.is_none()).count(),
                candidates.len()
            );
        }

        (outcomes, timed_out)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%)")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar
    }
}

/// Forward lookup, then (optionally) reverse lookup of each address.
async fn probe_candidate(
    candidate: &Candidate,
    forward: &dyn ForwardResolve,
    reverse: &dyn ReverseResolve,
    reverse_enabled: bool,
) -> CandidateOutcome {
    let ips = match forward.resolve_ipv4(candidate.as_str()).await {
        Ok(ips) => ips,
        Err(e) => {
            warn!("{}", e);
            return CandidateOutcome::Failed;
        }
    };

    if ips.is_empty() {
        return CandidateOutcome::Absent;
    }

    let mut records = Vec::with_capacity(ips.len());
    for ip in ips {
        let ptrs = if reverse_enabled {
            reverse.reverse_lookup(&ip).await
        } else {
            Vec::new()
        };
        debug!("{} -> {} {:?}", candidate, ip, ptrs);
        records.push(Record {
            fqdn: candidate.as_str().to_string(),
            ip,
            ptrs,
        });
    }

    CandidateOutcome::Found(records)
}
