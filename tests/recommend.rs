use std::{collections::BTreeSet, thread};

use elective_recommender::{
    ColdStartPolicy, CourseId, FactorModel, RatingScale, RatingStore, RecErr, Recommender, StudentId,
    Trainer,
    catalog::{Course, Student, University},
};

fn store() -> RatingStore {
    let ratings = [
        ("nr1", "ST104a", 9.),
        ("nr1", "MT1174", 8.),
        ("nr2", "MT1173", 8.),
        ("nr2", "EC1002", 2.),
        ("nr3", "ST104a", 7.),
        ("nr3", "ST104b", 9.),
        ("nr4", "MT1174", 9.),
        ("nr4", "EC1002", 3.),
    ];
    RatingStore::from_ratings(RatingScale::default(), ratings).unwrap()
}

fn trainer() -> Trainer {
    Trainer::builder()
        .latent_dim(3)
        .epochs(100)
        .seed(3)
        .build()
        .unwrap()
}

#[test]
fn recommendations_skip_rated_courses_and_respect_top_n() {
    let store = store();
    let (model, _) = trainer().train(&store).unwrap();
    let recommender = Recommender::new(&model, &store);

    for student in store.students() {
        let rated: BTreeSet<_> = store.rated_by(student).map(|(c, _)| c.clone()).collect();

        for top_n in [0, 1, 2, 10] {
            let recs = recommender.recommend_all(student, top_n).unwrap();

            assert!(recs.len() <= top_n);
            assert!(recs.iter().all(|r| !rated.contains(&r.course)));
            assert!(recs.windows(2).all(|w| {
                w[0].score > w[1].score || (w[0].score == w[1].score && w[0].course < w[1].course)
            }));
        }

        let all = recommender.recommend_all(student, usize::MAX).unwrap();
        assert_eq!(all.len(), model.num_courses() - rated.len());
    }
}

#[test]
fn recommendations_are_deterministic() {
    let store = store();
    let (model, _) = trainer().train(&store).unwrap();
    let recommender = Recommender::new(&model, &store);
    let nr2 = StudentId::new("nr2");

    assert_eq!(
        recommender.recommend_all(&nr2, 3).unwrap(),
        recommender.recommend_all(&nr2, 3).unwrap()
    );
}

#[test]
fn cold_start_policies() {
    let store = store();
    let (mut model, _) = trainer().train(&store).unwrap();
    let newcomer = StudentId::new("nr9");

    let err = Recommender::new(&model, &store)
        .recommend_all(&newcomer, 3)
        .unwrap_err();
    assert!(matches!(err, RecErr::UnknownEntity(_)));

    let fallback = Recommender::new(&model, &store)
        .cold_start(ColdStartPolicy::GlobalMean)
        .recommend_all(&newcomer, 10)
        .unwrap();
    for rec in &fallback {
        let expected = model.mean() + model.course_bias(&rec.course).unwrap();
        assert_eq!(rec.score, expected);
    }

    model.register_student(newcomer.clone()).unwrap();
    let registered = Recommender::new(&model, &store)
        .recommend_all(&newcomer, 10)
        .unwrap();
    assert_eq!(registered, fallback);
}

#[test]
fn catalog_to_recommendations() {
    let mut uni = University::new("London School of Economics", "LSE");
    for (id, terms) in [("nr1", 2), ("nr2", 7), ("nr3", 4)] {
        uni.register_student(Student::new(id, format!("Student {id}"), terms))
            .unwrap();
    }
    for (id, name) in [("ST104a", "Statistics 1"), ("MT1174", "Calculus"), ("MT1173", "Linear Algebra")] {
        uni.add_course(Course::new(id, name, 1)).unwrap();
    }

    for (s, c, r) in [("nr1", "ST104a", 9.), ("nr1", "MT1174", 8.), ("nr2", "MT1173", 8.)] {
        let (s, c) = (StudentId::new(s), CourseId::new(c));
        uni.enroll(&s, &c).unwrap();
        uni.rate_course(&s, &c, r).unwrap();
    }

    let store = uni.rating_store().unwrap();
    let (model, _) = trainer().train(&store).unwrap();
    let recommender = Recommender::new(&model, &store).clamp(true);

    let recs = recommender.recommend_all(&"nr1".into(), 3).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].course.as_str(), "MT1173");

    let recs = recommender.recommend_all(&"nr3".into(), 3).unwrap();
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| (1. ..=10.).contains(&r.score)));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn models_are_shareable_across_threads() {
    assert_send_sync::<FactorModel>();
    assert_send_sync::<RatingStore>();
    assert_send_sync::<Recommender<'static>>();
}

#[test]
fn concurrent_recommendations_agree() {
    let store = store();
    let (model, _) = trainer().train(&store).unwrap();
    let expected: Vec<_> = store
        .students()
        .map(|s| Recommender::new(&model, &store).recommend_all(s, 3).unwrap())
        .collect();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let recommender = Recommender::new(&model, &store);
                    store
                        .students()
                        .map(|s| recommender.recommend_all(s, 3).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}
