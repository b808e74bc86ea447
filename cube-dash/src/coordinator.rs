//! Dashboard coordinator.
//!
//! Holds the global filter selection and every widget's state. Each change
//! of selection starts a new cycle with a higher generation; a result is only
//! applied while its generation is still the current one, so a slow response
//! from an earlier selection can never overwrite a newer one.
//!
//! The coordinator is single-threaded (`Rc<RefCell<_>>`) and does not spawn
//! anything itself. [`Coordinator::run`] drives a cycle's fetches with
//! `join_all`, so it works under tokio and under the browser's executor.

use crate::selection::{CanonicalFilters, FilterSelection};
use crate::widget::{WidgetError, WidgetSpec, WidgetState};
use cube_data::normalize;
use cube_query::{Query, QueryError, QueryExecutor, QueryResponse};
use futures::future::join_all;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

/// Something observers may want to re-render for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    CycleStarted { generation: u64 },
    WidgetUpdated { widget: String, generation: u64 },
    CycleFinished { generation: u64 },
    Reset,
}

/// The fetches one selection change requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub generation: u64,
    pub selection: FilterSelection,
    /// `(widget id, query)` for every widget
    pub requests: Vec<(String, Query)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub generation: u64,
    pub applied: usize,
    pub discarded: usize,
}

struct State {
    widgets: Vec<WidgetSpec>,
    states: HashMap<String, WidgetState>,
    selection: FilterSelection,
    applied: Option<CanonicalFilters>,
    generation: u64,
    pending: usize,
    phase: Phase,
}

type Listener = Rc<dyn Fn(&CoordinatorEvent)>;

#[derive(Clone)]
pub struct Coordinator {
    state: Rc<RefCell<State>>,
    listeners: Rc<RefCell<Vec<(SubscriptionId, Listener)>>>,
    next_subscription: Rc<Cell<SubscriptionId>>,
}

impl Coordinator {
    /// Widget ids must be unique; a later spec reusing an id is dropped.
    pub fn new(widgets: Vec<WidgetSpec>) -> Self {
        let mut seen = HashSet::new();
        let widgets: Vec<WidgetSpec> = widgets
            .into_iter()
            .filter(|w| {
                let fresh = seen.insert(w.id.clone());
                if !fresh {
                    warn!("Ignoring duplicate widget id {}", w.id);
                }
                fresh
            })
            .collect();
        let states = widgets
            .iter()
            .map(|w| (w.id.clone(), WidgetState::Loading))
            .collect();
        Self {
            state: Rc::new(RefCell::new(State {
                widgets,
                states,
                selection: FilterSelection::default(),
                applied: None,
                generation: 0,
                pending: 0,
                phase: Phase::Idle,
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_subscription: Rc::new(Cell::new(1)),
        }
    }

    /// Replace the selection. Returns the cycle to run, or `None` when the
    /// selection is equivalent to the one already applied.
    pub fn select(&self, selection: FilterSelection) -> Option<Cycle> {
        let canonical = selection.canonical();
        {
            let mut state = self.state.borrow_mut();
            if state.applied.as_ref() == Some(&canonical) {
                debug!("Selection unchanged, skipping refresh");
                state.selection = selection;
                return None;
            }
        }
        Some(self.start_cycle(selection, canonical))
    }

    /// Start a cycle for the current selection even if it is unchanged.
    pub fn refresh_cycle(&self) -> Cycle {
        let selection = self.selection();
        let canonical = selection.canonical();
        self.start_cycle(selection, canonical)
    }

    fn start_cycle(&self, selection: FilterSelection, canonical: CanonicalFilters) -> Cycle {
        let cycle = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.applied = Some(canonical);
            state.selection = selection.clone();
            let ids: Vec<String> = state.widgets.iter().map(|w| w.id.clone()).collect();
            for id in ids {
                state.states.insert(id, WidgetState::Loading);
            }
            state.pending = state.widgets.len();
            state.phase = if state.pending == 0 { Phase::Idle } else { Phase::Loading };

            let requests = state
                .widgets
                .iter()
                .map(|w| (w.id.clone(), w.query(&selection)))
                .collect();
            Cycle {
                generation: state.generation,
                selection,
                requests,
            }
        };
        info!(
            "Starting refresh cycle {} for {} widgets",
            cycle.generation,
            cycle.requests.len()
        );
        self.notify(&CoordinatorEvent::CycleStarted {
            generation: cycle.generation,
        });
        cycle
    }

    /// Execute every request of `cycle` concurrently, applying each result as
    /// soon as it arrives.
    pub async fn run<E: QueryExecutor>(&self, cycle: Cycle, executor: &E) -> RunSummary {
        let generation = cycle.generation;
        let fetches = cycle.requests.into_iter().map(move |(widget, query)| async move {
            let result = executor.execute(&query).await;
            self.resolve(generation, &widget, result)
        });
        let resolutions = join_all(fetches).await;

        let applied = resolutions.iter().filter(|r| **r == Resolution::Applied).count();
        RunSummary {
            generation,
            applied,
            discarded: resolutions.len() - applied,
        }
    }

    /// Select and, if the selection changed, run the resulting cycle.
    pub async fn apply<E: QueryExecutor>(
        &self,
        selection: FilterSelection,
        executor: &E,
    ) -> Option<RunSummary> {
        match self.select(selection) {
            Some(cycle) => Some(self.run(cycle, executor).await),
            None => None,
        }
    }

    /// Re-run every widget's query for the current selection.
    pub async fn refresh<E: QueryExecutor>(&self, executor: &E) -> RunSummary {
        let cycle = self.refresh_cycle();
        self.run(cycle, executor).await
    }

    /// Apply one widget's result if `generation` is still current.
    pub fn resolve(
        &self,
        generation: u64,
        widget: &str,
        result: Result<QueryResponse, QueryError>,
    ) -> Resolution {
        let finished = {
            let mut state = self.state.borrow_mut();
            if generation != state.generation {
                debug!(
                    "Discarding stale result for {} (cycle {}, current {})",
                    widget, generation, state.generation
                );
                return Resolution::Discarded;
            }
            let Some(spec) = state.widgets.iter().find(|w| w.id == widget).cloned() else {
                warn!("Result for unknown widget {}", widget);
                return Resolution::Discarded;
            };
            let recipe = spec.recipe(&state.selection);

            let next = match result.map_err(WidgetError::from).and_then(|response| {
                normalize(&response, &recipe).map_err(WidgetError::from)
            }) {
                Ok(series) => WidgetState::from_series(series),
                Err(e) => {
                    warn!("Widget {} failed: {}", widget, e);
                    WidgetState::Failed(e)
                }
            };

            let was_loading = state
                .states
                .insert(widget.to_string(), next)
                .is_some_and(|previous| previous.is_loading());
            if was_loading {
                state.pending = state.pending.saturating_sub(1);
            }
            let finished = was_loading && state.pending == 0;
            if finished {
                state.phase = Phase::Idle;
            }
            finished
        };

        self.notify(&CoordinatorEvent::WidgetUpdated {
            widget: widget.to_string(),
            generation,
        });
        if finished {
            info!("Refresh cycle {} finished", generation);
            self.notify(&CoordinatorEvent::CycleFinished { generation });
        }
        Resolution::Applied
    }

    /// Forget the selection and every result, and invalidate in-flight
    /// cycles. Used on sign-out.
    pub fn reset(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.selection = FilterSelection::default();
            state.applied = None;
            state.pending = 0;
            state.phase = Phase::Idle;
            for widget_state in state.states.values_mut() {
                *widget_state = WidgetState::Loading;
            }
        }
        info!("Dashboard state reset");
        self.notify(&CoordinatorEvent::Reset);
    }

    pub fn subscribe(&self, listener: impl Fn(&CoordinatorEvent) + 'static) -> SubscriptionId {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    // Listeners may call back into the coordinator, so no borrow is held
    // while they run.
    fn notify(&self, event: &CoordinatorEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn selection(&self) -> FilterSelection {
        self.state.borrow().selection.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn widgets(&self) -> Vec<WidgetSpec> {
        self.state.borrow().widgets.clone()
    }

    pub fn widget_state(&self, widget: &str) -> Option<WidgetState> {
        self.state.borrow().states.get(widget).cloned()
    }

    /// Every widget's state, in display order.
    pub fn widget_states(&self) -> Vec<(WidgetSpec, WidgetState)> {
        let state = self.state.borrow();
        state
            .widgets
            .iter()
            .filter_map(|w| state.states.get(&w.id).map(|s| (w.clone(), s.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{members, ReportIntent};
    use crate::test_utils::{region_rows, response, FixtureExecutor, ScriptedExecutor};
    use cube_data::WidgetKind;
    use futures::channel::oneshot;

    fn region_widget() -> Coordinator {
        Coordinator::new(vec![WidgetSpec::new(ReportIntent::RevenueByRegion)])
    }

    fn europe() -> FilterSelection {
        FilterSelection::new().with_values(members::REGION, ["EUROPE"])
    }

    fn america() -> FilterSelection {
        FilterSelection::new().with_values(members::REGION, ["AMERICA"])
    }

    #[test]
    fn test_new_coordinator_is_idle_and_loading() {
        let coordinator = Coordinator::new(WidgetSpec::defaults());
        assert_eq!(coordinator.generation(), 0);
        assert_eq!(coordinator.phase(), Phase::Idle);
        let states = coordinator.widget_states();
        assert_eq!(states.len(), ReportIntent::ALL.len());
        assert!(states.iter().all(|(_, s)| s.is_loading()));
    }

    #[tokio::test]
    async fn test_duplicate_widget_ids_keep_the_first() {
        let coordinator = Coordinator::new(vec![
            WidgetSpec::new(ReportIntent::RevenueByRegion),
            WidgetSpec::new(ReportIntent::OrdersByStatus),
            WidgetSpec::new(ReportIntent::RevenueByRegion),
        ]);
        assert_eq!(coordinator.widgets().len(), 2);

        let executor = FixtureExecutor::new(|query| Ok(response(query, Vec::new())));
        let summary = coordinator.refresh(&executor).await;
        assert_eq!(executor.calls(), 2);
        assert_eq!(summary.applied, 2);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_select_starts_cycle_for_every_widget() {
        let coordinator = Coordinator::new(WidgetSpec::defaults());
        let cycle = coordinator.select(europe()).unwrap();
        assert_eq!(cycle.generation, 1);
        assert_eq!(cycle.requests.len(), ReportIntent::ALL.len());
        assert!(cycle.requests.iter().all(|(_, q)| q.filters().len() == 1));
        assert!(coordinator.is_loading());
    }

    #[test]
    fn test_equivalent_selection_does_not_refetch() {
        let coordinator = region_widget();
        assert!(coordinator.select(europe()).is_some());
        let same = FilterSelection::new().with_values(members::REGION, ["EUROPE", " EUROPE"]);
        assert!(coordinator.select(same).is_none());
        assert_eq!(coordinator.generation(), 1);

        // An explicit refresh always starts a cycle
        assert_eq!(coordinator.refresh_cycle().generation, 2);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let coordinator = region_widget();
        let first = coordinator.select(europe()).unwrap();
        let second = coordinator.select(america()).unwrap();
        let (widget, query) = &second.requests[0];

        let fresh = response(query, region_rows(&[("AMERICA", "150.50")]));
        assert_eq!(
            coordinator.resolve(second.generation, widget, Ok(fresh)),
            Resolution::Applied
        );
        let stale = response(&first.requests[0].1, region_rows(&[("EUROPE", "999")]));
        assert_eq!(
            coordinator.resolve(first.generation, widget, Ok(stale)),
            Resolution::Discarded
        );

        let state = coordinator.widget_state(widget).unwrap();
        let series = state.series().unwrap();
        assert_eq!(series.labels(), ["AMERICA"]);
        assert_eq!(series.series()[0].values, vec![150.50]);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_late_response_from_superseded_cycle_loses() {
        let coordinator = region_widget();
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let executor = ScriptedExecutor::new(vec![rx_a, rx_b]);

        let cycle_a = coordinator.select(europe()).unwrap();
        let cycle_b = coordinator.select(america()).unwrap();
        let query_a = cycle_a.requests[0].1.clone();
        let query_b = cycle_b.requests[0].1.clone();

        let (summary_a, summary_b, ()) = futures::join!(
            coordinator.run(cycle_a, &executor),
            coordinator.run(cycle_b, &executor),
            async {
                tx_b.send(Ok(response(&query_b, region_rows(&[("AMERICA", "10")]))))
                    .unwrap();
                futures::pending!();
                tx_a.send(Ok(response(&query_a, region_rows(&[("EUROPE", "20")]))))
                    .unwrap();
            }
        );

        assert_eq!(summary_a.discarded, 1);
        assert_eq!(summary_b.applied, 1);
        let state = coordinator.widget_state("revenue-by-region").unwrap();
        assert_eq!(state.series().unwrap().labels(), ["AMERICA"]);
        assert_eq!(executor.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_siblings() {
        let coordinator = Coordinator::new(WidgetSpec::defaults());
        let executor = FixtureExecutor::new(|query| {
            if query.dimensions() == [members::ORDER_STATUS] {
                Err(QueryError::RemoteFault("boom".into()))
            } else {
                Ok(response(query, Vec::new()))
            }
        });

        let summary = coordinator.refresh(&executor).await;
        assert_eq!(summary.applied, ReportIntent::ALL.len());
        assert_eq!(executor.calls(), ReportIntent::ALL.len());

        for (spec, state) in coordinator.widget_states() {
            if spec.intent == ReportIntent::OrdersByStatus {
                assert!(matches!(
                    state,
                    WidgetState::Failed(WidgetError::Query(QueryError::RemoteFault(_)))
                ));
            } else {
                assert!(matches!(state, WidgetState::Empty(_)), "{:?}", spec.id);
            }
        }
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_series_names() {
        let coordinator = Coordinator::new(vec![WidgetSpec::new(ReportIntent::KpiSummary)]);
        let executor = FixtureExecutor::new(|query| Ok(response(query, Vec::new())));
        coordinator.apply(europe(), &executor).await.unwrap();

        let state = coordinator.widget_state("kpi-summary").unwrap();
        let WidgetState::Empty(series) = state else {
            panic!("expected empty state, got {:?}", state);
        };
        assert_eq!(series.kind(), WidgetKind::Kpi);
        let names: Vec<&str> = series.series().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Total Sales", "Orders", "Avg Order Value"]);
    }

    #[tokio::test]
    async fn test_apply_skips_unchanged_selection() {
        let coordinator = region_widget();
        let executor = FixtureExecutor::new(|query| {
            Ok(response(query, region_rows(&[("EUROPE", "1"), ("EUROPE", "2")])))
        });
        assert!(coordinator.apply(europe(), &executor).await.is_some());
        assert!(coordinator.apply(europe(), &executor).await.is_none());
        assert_eq!(executor.calls(), 1);

        let state = coordinator.widget_state("revenue-by-region").unwrap();
        assert_eq!(state.series().unwrap().series()[0].values, vec![3.0]);
    }

    #[test]
    fn test_events_and_reset() {
        let coordinator = region_widget();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let observer = coordinator.clone();
        let id = coordinator.subscribe(move |event| {
            // Reading state from inside a listener must not panic
            let _ = observer.phase();
            sink.borrow_mut().push(event.clone());
        });

        let cycle = coordinator.select(europe()).unwrap();
        let (widget, query) = &cycle.requests[0];
        coordinator.resolve(cycle.generation, widget, Ok(response(query, Vec::new())));
        coordinator.reset();

        assert_eq!(
            *seen.borrow(),
            vec![
                CoordinatorEvent::CycleStarted { generation: 1 },
                CoordinatorEvent::WidgetUpdated {
                    widget: widget.clone(),
                    generation: 1
                },
                CoordinatorEvent::CycleFinished { generation: 1 },
                CoordinatorEvent::Reset,
            ]
        );
        assert_eq!(coordinator.selection(), FilterSelection::default());
        assert!(coordinator.widget_state(widget).unwrap().is_loading());

        // Results from before the reset are stale
        assert_eq!(
            coordinator.resolve(cycle.generation, widget, Ok(response(query, Vec::new()))),
            Resolution::Discarded
        );
        assert!(coordinator.unsubscribe(id));
        assert!(!coordinator.unsubscribe(id));
    }
}
