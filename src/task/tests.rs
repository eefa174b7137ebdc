use crate::config::Granularity;
use crate::rational::Rational;
use crate::task::{ConfigurationError, Field, TaskSet};

use crate::tests::{d, i, q, task_set};

#[test]
fn indices_follow_input_order() {
    let ts = task_set(&[(1, 3, 3), (2, 4, 5), (1, 2, 2)]);
    assert_eq!(ts.len(), 3);
    let indices: Vec<_> = ts.iter().map(|t| t.index()).collect();
    assert_eq!(indices, vec![i(0), i(1), i(2)]);
    assert_eq!(ts.get(i(1)).map(|t| t.period), Some(Rational::integer(4)));
    assert!(ts.get(i(3)).is_none());
}

#[test]
fn conversion_to_ticks() {
    let ts = TaskSet::from_params(vec![(q(250), q(500), q(500)), (q(1500), q(3000), q(2750))]);
    let ticks = ts.to_ticks(&Granularity::default()).unwrap();
    assert_eq!(ticks[0].execution, d(250));
    assert_eq!(ticks[0].period, d(500));
    assert_eq!(ticks[1].execution, d(1500));
    assert_eq!(ticks[1].period, d(3000));
    assert_eq!(ticks[1].deadline, d(2750));
    assert_eq!(ticks[1].index, i(1));
}

#[test]
fn zero_parameters_are_rejected() {
    let g = Granularity::default();
    let ts = task_set(&[(1, 3, 3), (1, 0, 3)]);
    assert_eq!(
        ts.to_ticks(&g),
        Err(ConfigurationError::NonPositive {
            task: i(1),
            field: Field::Period
        })
    );

    let ts = task_set(&[(0, 3, 3)]);
    assert_eq!(
        ts.to_ticks(&g),
        Err(ConfigurationError::NonPositive {
            task: i(0),
            field: Field::ExecutionTime
        })
    );

    let ts = task_set(&[(1, 3, 0)]);
    assert_eq!(
        ts.to_ticks(&g),
        Err(ConfigurationError::NonPositive {
            task: i(0),
            field: Field::Deadline
        })
    );
}

#[test]
fn execution_longer_than_period_is_rejected() {
    let ts = task_set(&[(4, 3, 3)]);
    assert!(matches!(
        ts.to_ticks(&Granularity::default()),
        Err(ConfigurationError::ExecutionExceedsPeriod { task, .. }) if task == i(0)
    ));
}

#[test]
fn execution_equal_to_period_is_fine() {
    let ts = task_set(&[(5, 5, 5)]);
    assert!(ts.to_ticks(&Granularity::default()).is_ok());
}

#[test]
fn values_finer_than_a_tick_are_rejected() {
    let third = Rational::new(1, 3).unwrap();
    let ts = TaskSet::from_params(vec![(q(100), third, third)]);
    assert_eq!(
        ts.to_ticks(&Granularity::default()),
        Err(ConfigurationError::NotRepresentable {
            task: i(0),
            field: Field::Period,
            value: third
        })
    );
}

#[test]
fn error_messages() {
    let err = ConfigurationError::NonPositive {
        task: i(2),
        field: Field::ExecutionTime,
    };
    assert_eq!(err.to_string(), "task 2: execution time must be positive");
}

#[test]
fn utilization_per_task() {
    let ts = task_set(&[(1, 3, 3), (2, 4, 4)]);
    let u: Vec<_> = ts.iter().map(|t| t.utilization()).collect();
    assert_eq!(u, vec![Rational::new(1, 3), Rational::new(1, 2)]);
}
