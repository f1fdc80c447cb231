use log::debug;
use replog_domain::{ExerciseLogService, LogBook, Name, ReadError, Reps, UpdateError};

use crate::chart::{Geometry, Point};

/// The value shown for one series in the tooltip.
///
/// `reps` is `None` if the series is shorter than the hovered index.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipValue {
    pub exercise: Name,
    pub reps: Option<Reps>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Hovering {
        index: usize,
        values: Vec<TooltipValue>,
        anchor: Point,
    },
    Editing {
        index: usize,
        values: Vec<TooltipValue>,
        anchor: Point,
        series: usize,
        pending: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Refresh(#[from] ReadError),
}

/// Tooltip and inline-edit interaction of the statistics chart.
///
/// Owns the complete view state of the interaction; render and input
/// handling routines receive it by reference instead of sharing globals.
/// Pointer-move handling recomputes the state from scratch on every call
/// and is safe to invoke once per gesture update.
#[derive(Debug, Default)]
pub struct Engine {
    state: Interaction,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &Interaction {
        &self.state
    }

    /// The index of the currently highlighted column, if any.
    #[must_use]
    pub fn hovered_index(&self) -> Option<usize> {
        match &self.state {
            Interaction::Idle => None,
            Interaction::Hovering { index, .. } | Interaction::Editing { index, .. } => {
                Some(*index)
            }
        }
    }

    /// Map a pointer position to the nearest data column.
    ///
    /// A no-op while editing. Outside the plotted rectangle the tooltip is
    /// dropped.
    pub fn on_pointer_move(
        &mut self,
        point: Point,
        geometry: &Geometry,
        book: &LogBook,
        exercises: &[&Name],
    ) {
        if matches!(self.state, Interaction::Editing { .. }) {
            return;
        }

        let len = exercises
            .iter()
            .map(|name| book.series_for(name).count())
            .max()
            .unwrap_or(0);

        if len == 0 || !geometry.contains(point) {
            self.state = Interaction::Idle;
            return;
        }

        let index = geometry.nearest_index(point.x, len);
        let values = exercises
            .iter()
            .map(|name| TooltipValue {
                exercise: (*name).clone(),
                reps: book.series_for(name).nth(index).map(|(_, reps)| reps),
            })
            .collect();

        self.state = Interaction::Hovering {
            index,
            values,
            anchor: geometry.anchor(index, len),
        };
    }

    /// Drop the tooltip at the end of a gesture, unless an edit is open.
    pub fn on_gesture_end(&mut self) {
        if !matches!(self.state, Interaction::Editing { .. }) {
            self.state = Interaction::Idle;
        }
    }

    /// A tap outside the chart dismisses the tooltip and any pending edit.
    pub fn on_outside_tap(&mut self) {
        self.state = Interaction::Idle;
    }

    /// Open the edit field for one tooltip row. Valid only while hovering.
    pub fn begin_edit(&mut self, series: usize) {
        if let Interaction::Hovering {
            index,
            values,
            anchor,
        } = &self.state
        {
            let Some(value) = values.get(series) else {
                return;
            };
            let pending = value.reps.map(|reps| reps.to_string()).unwrap_or_default();
            self.state = Interaction::Editing {
                index: *index,
                values: values.clone(),
                anchor: *anchor,
                series,
                pending,
            };
        }
    }

    /// Replace the pending edit text verbatim. No validation until submit.
    pub fn update_pending_value(&mut self, text: &str) {
        if let Interaction::Editing { pending, .. } = &mut self.state {
            text.clone_into(pending);
        }
    }

    /// Submit the pending edit through the gateway.
    ///
    /// Unparsable text and unresolvable targets (the edited series is
    /// shorter than the hovered index) are discarded silently and the edit
    /// stays open. On success the updated value is shown immediately and
    /// reconciled once the refresh has resolved: the refreshed store wins
    /// except where it still disagrees with the accepted write.
    pub async fn submit_edit<S: ExerciseLogService>(
        &mut self,
        service: &S,
        book: &mut LogBook,
        person: &Name,
    ) -> Result<(), SubmitError> {
        let (index, series, anchor, values, exercise, reps) = {
            let Interaction::Editing {
                index,
                values,
                anchor,
                series,
                pending,
            } = &self.state
            else {
                return Ok(());
            };
            let Ok(reps) = Reps::try_from(pending.as_str()) else {
                debug!("discarding edit: not a valid repetition count: {pending:?}");
                return Ok(());
            };
            let Some(target) = values.get(*series) else {
                return Ok(());
            };
            (
                *index,
                *series,
                *anchor,
                values.clone(),
                target.exercise.clone(),
                reps,
            )
        };

        let Some((date, _)) = book.series_for(&exercise).nth(index) else {
            debug!("discarding edit: {exercise} has no entry at index {index}");
            return Ok(());
        };

        book.update(service, person, &exercise, date, reps).await?;

        let mut values = values;
        values[series].reps = Some(reps);
        self.state = Interaction::Hovering {
            index,
            values: values.clone(),
            anchor,
        };

        book.refresh(service, person).await?;

        for value in &mut values {
            value.reps = book
                .series_for(&value.exercise)
                .nth(index)
                .map(|(_, reps)| reps);
        }
        if values[series].reps != Some(reps) {
            // a stale refresh response may not contain the accepted write yet
            values[series].reps = Some(reps);
        }
        self.state = Interaction::Hovering {
            index,
            values,
            anchor,
        };

        Ok(())
    }
}
