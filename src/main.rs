use std::env;

use anyhow::Result;
use elective_recommender::{
    FactorModel, RatingScale, RatingStore, Recommender, Trainer, TrainerConfig,
    catalog::{Course, Student, University},
    ratings,
};
use log::info;

const DEFAULT_SEED: u64 = 42;
const RECOMMENDATIONS: usize = 3;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let store = match args.next() {
        Some(path) => {
            info!("loading ratings from {path}");
            ratings::load_ratings(&path, RatingScale::default())?
        }
        None => {
            let uni = demo_university()?;
            info!("using the demo university {}", uni.name());
            uni.rating_store()?
        }
    };

    let config = match args.next() {
        Some(path) => TrainerConfig::from_json_file(&path)?,
        None => TrainerConfig {
            k: 3,
            epochs: 200,
            seed: Some(DEFAULT_SEED),
            ..Default::default()
        },
    };

    let trainer = Trainer::new(config)?;
    let (model, report) = trainer.train(&store)?;
    info!(
        "trained {} epochs ({:?}), final rmse {:.4}",
        report.epochs().len(),
        report.stop_reason(),
        report.final_rmse().unwrap_or_default()
    );

    print_recommendations(&model, &store)
}

fn print_recommendations(model: &FactorModel, store: &RatingStore) -> Result<()> {
    let recommender = Recommender::new(model, store).clamp(true);

    for student in store.students() {
        let recs = recommender.recommend_all(student, RECOMMENDATIONS)?;
        println!("{student}:");
        for rec in recs {
            println!("  {:<8} {:.2}", rec.course.as_str(), rec.score);
        }
    }

    Ok(())
}

fn demo_university() -> Result<University> {
    let mut uni = University::new("London School of Economics", "LSE");

    let students = [
        ("nr1", "Name Surname", 2),
        ("nr2", "Name1 Name2 Surname", 7),
        ("nr3", "Ada Lovelace", 4),
        ("nr4", "Alan Turing", 5),
        ("nr5", "Emmy Noether", 3),
    ];
    for (id, name, terms) in students {
        uni.register_student(Student::new(id, name, terms))?;
    }

    let courses = [
        ("ST104a", "Statistics 1", 1),
        ("ST104b", "Statistics 2", 2),
        ("MT1174", "Calculus", 2),
        ("MT1173", "Linear Algebra", 5),
        ("EC1002", "Introduction to Economics", 1),
        ("IS1060", "Introduction to Information Systems", 3),
    ];
    for (id, name, semester) in courses {
        uni.add_course(Course::new(id, name, semester))?;
    }

    let ratings = [
        ("nr1", "ST104a", 9.),
        ("nr1", "MT1174", 8.),
        ("nr2", "MT1173", 8.),
        ("nr2", "EC1002", 3.),
        ("nr3", "ST104a", 8.),
        ("nr3", "ST104b", 9.),
        ("nr3", "IS1060", 4.),
        ("nr4", "MT1174", 9.),
        ("nr4", "MT1173", 9.),
        ("nr4", "EC1002", 2.),
        ("nr5", "EC1002", 9.),
        ("nr5", "IS1060", 8.),
        ("nr5", "ST104a", 3.),
    ];
    for (student, course, rating) in ratings {
        let (student, course) = (student.into(), course.into());
        uni.enroll(&student, &course)?;
        uni.rate_course(&student, &course, rating)?;
    }

    Ok(uni)
}
