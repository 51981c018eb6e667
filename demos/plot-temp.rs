use plotters::prelude::*;
use wxreport::{convert_f_to_c, Report};

fn main() {
    let input = std::env::args().nth(1).expect("Missing filename");
    println!("opening {input}");
    let output = format!("{input}.png");

    let report = Report::from_path(&input).unwrap();

    let first_date = report.first_date().expect("empty report");
    let last_date = report.last_date().expect("empty report");
    let temperatures = report.temperature_range().expect("empty report");

    let root = BitMapBackend::new(&output, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).unwrap();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Daily temperatures from {first_date} to {last_date}"),
            ("sans-serif", 100).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(to_chrono(first_date)..to_chrono(last_date), temperatures)
        .unwrap();

    chart.configure_mesh().draw().unwrap();

    chart
        .draw_series(LineSeries::new(
            report
                .days
                .iter()
                .map(|day| (to_chrono(day.date), convert_f_to_c(day.max_temp as f64))),
            RED,
        ))
        .unwrap()
        .label("Maximum temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(LineSeries::new(
            report
                .days
                .iter()
                .map(|day| (to_chrono(day.date), convert_f_to_c(day.min_temp as f64))),
            BLUE,
        ))
        .unwrap()
        .label("Minimum temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .unwrap();

    root.present().unwrap();
}

fn to_chrono(date: time::Date) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32)
        .expect("date out of chrono range")
}
