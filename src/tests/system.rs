//! End-to-end coverage analyses: propagation, sensor geometry and
//! interval aggregation working together.

use crate::prelude::*;

use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Conical-sensor analysis over a helical grid: propagate in 60 s
/// steps for 0.1 day, accumulating coverage at every step.
fn run_conical_analysis(
    point_group: &PointGroup,
) -> (Vec<IntervalEventReport>, Vec<usize>, Vec<Vec<usize>>, f64) {
    let epoch = AbsoluteDate::from_gregorian(2017, 1, 15, 22, 30, 20.111);
    let state = OrbitState::from_keplerian(
        6900.0,
        0.002,
        PI / 3.0,
        PI / 4.0,
        PI / 4.0,
        PI / 4.0,
    );

    let mut sat = Spacecraft::new(
        epoch,
        state,
        NadirPointingAttitude::new(),
        LagrangeInterpolator::default(),
    );
    sat.add_sensor(Sensor::conical(30.0 * DEG));

    let mut checker = CoverageChecker::new(point_group);
    checker.set_compute_poi_geometry(true);

    let mut prop = Propagator::new(&sat);

    let start_jd = epoch.julian_date();
    let mut date = epoch;
    prop.propagate(&mut sat, &date).unwrap();

    while date.julian_date() < start_jd + 0.1 {
        checker.accumulate_coverage_data(&sat);
        date.advance(60.0);
        prop.propagate(&mut sat, &date).unwrap();
    }

    let reports = checker.process_coverage_data();
    let num_events = checker.num_events_per_point().to_vec();
    let series: Vec<Vec<usize>> = (0..point_group.num_points())
        .map(|index| checker.time_series(index).to_vec())
        .collect();

    (reports, num_events, series, date.julian_date())
}

#[test]
fn conical_sensor_access_intervals() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut pg = PointGroup::new();
    pg.add_helical_points_by_num_points(200);

    let epoch_jd = AbsoluteDate::from_gregorian(2017, 1, 15, 22, 30, 20.111).julian_date();
    let (reports, num_events, series, sweep_end_jd) = run_conical_analysis(&pg);

    assert!(!reports.is_empty(), "sweep must produce access intervals");

    for report in &reports {
        assert!(report.poi_index < pg.num_points());
        assert!(report.start.julian_date() <= report.end.julian_date());
        assert!(report.start.julian_date() >= epoch_jd - 1.0e-9);
        assert!(report.end.julian_date() <= sweep_end_jd + 1.0e-9);

        // every interval spans at least two consecutive samples
        assert!(report.duration_s() >= 59.9);
    }

    for (index, events) in num_events.iter().enumerate() {
        assert_eq!(
            *events,
            series[index].len(),
            "event count mismatch for point {index}"
        );

        // visible-sample indices are strictly increasing
        for pair in series[index].windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}

#[test]
fn coverage_is_deterministic() {
    let mut pg = PointGroup::new();
    pg.add_helical_points_by_num_points(200);

    let (first, _, _, _) = run_conical_analysis(&pg);
    let (second, _, _, _) = run_conical_analysis(&pg);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.poi_index, b.poi_index);
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
        assert_eq!(a.poi_events.len(), b.poi_events.len());
    }
}

#[test]
fn propagate_then_interpolate() {
    // sun-synchronous imaging orbit, rectangular sensor, coarse
    // propagation with dense interpolated accumulation
    let epoch = AbsoluteDate::from_gregorian(2019, 3, 19, 20, 16, 26.0);
    let state = OrbitState::from_keplerian(
        6378.137 + 703.0,
        0.0001323,
        98.1949 * DEG,
        150.0865 * DEG,
        76.7198 * DEG,
        283.4074 * DEG,
    );

    let mut sat = Spacecraft::new(
        epoch,
        state,
        NadirPointingAttitude::new(),
        LagrangeInterpolator::default(),
    );
    sat.add_sensor(Sensor::rectangular(15.0 * DEG, 15.0 * DEG));

    let mut pg = PointGroup::new();
    pg.add_helical_points_by_num_points(200);

    let mut checker = CoverageChecker::new(&pg);
    checker.set_compute_poi_geometry(true);

    let mut prop = Propagator::new(&sat);

    let start_jd = epoch.julian_date();
    let duration_days = 0.05;
    let prop_step_s = 60.0;
    let interp_step_days = 10.0 / 86400.0;

    let mut date = epoch;
    let mut interp_time = start_jd;
    prop.propagate(&mut sat, &date).unwrap();

    while date.julian_date() < start_jd + duration_days {
        date.advance(prop_step_s);
        prop.propagate(&mut sat, &date).unwrap();

        let prop_time = date.julian_date();
        if let Some(mid_range) = sat.time_to_interpolate(prop_time) {
            while interp_time < prop_time - mid_range {
                checker
                    .accumulate_coverage_data_at(&sat, interp_time)
                    .unwrap();
                interp_time += interp_step_days;
            }
        }
    }

    // finish the tail of the sweep
    let prop_time = date.julian_date();
    while interp_time <= prop_time {
        checker
            .accumulate_coverage_data_at(&sat, interp_time)
            .unwrap();
        interp_time += interp_step_days;
    }

    let dates = checker.date_buffer();
    assert!(!dates.is_empty());
    for pair in dates.windows(2) {
        assert!(pair[0] < pair[1], "sample dates must increase");
    }

    // dense sampling covers the sweep within one coarse step
    assert!(dates[0] >= start_jd - 1.0e-9);
    assert!(*dates.last().unwrap() <= prop_time + 1.0e-9);
    assert!(
        *dates.last().unwrap() >= start_jd + duration_days - 2.0 * prop_step_s / 86400.0
    );

    let reports = checker.process_coverage_data();
    for report in &reports {
        assert!(report.start.julian_date() <= report.end.julian_date());
        assert!(report.poi_index < pg.num_points());
    }

    // per-point bookkeeping stays consistent under interpolated
    // accumulation too
    for index in 0..pg.num_points() {
        assert_eq!(
            checker.num_events_per_point()[index],
            checker.time_series(index).len()
        );
    }
}
