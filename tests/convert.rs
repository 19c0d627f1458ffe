use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use bag2arff::error::Error;
use bag2arff::processing::{run, Config};

const SPLIT_BAG: &str = "4 3\n\
good\tbad\tugly\tclass\n\
1\t0\t0.333333\tsport-football\r\n\
0\t0\t0\tpolitics-election\r\n\
2\t4\t0\tsport-tennis\r\n\
0.5\t0\t7\tsport-football\r\n";

fn config(src: &Path, dst: &Path, token: Option<&str>) -> Config {
    Config {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        token: token.map(String::from),
        print_features: true,
        log: false,
    }
}

fn data_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .skip_while(|l| *l != "@data")
        .skip(1)
        .map(String::from)
        .collect()
}

fn class_set(content: &str) -> Vec<String> {
    let line = content
        .lines()
        .find(|l| l.starts_with("@attribute class_atr"))
        .unwrap();
    let inner = &line[line.find('{').unwrap() + 1..line.len() - 1];
    inner.split(',').map(String::from).collect()
}

/// (column, value) pairs of a data line, class pair included.
fn pairs(line: &str) -> Vec<(usize, String)> {
    line.trim_start_matches('{')
        .trim_end_matches('}')
        .split(", ")
        .map(|pair| {
            let (col, value) = pair.split_once(' ').unwrap();
            (col.parse().unwrap(), value.to_string())
        })
        .collect()
}

fn label(line: &str) -> String {
    pairs(line).last().unwrap().1.clone()
}

fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("bag");
    let dst = dir.path().join("arff");
    fs::create_dir(&src).unwrap();
    for (name, content) in files {
        fs::write(src.join(name), content).unwrap();
    }
    (dir, src, dst)
}

#[test]
fn single_feature_scenario() {
    let (_dir, src, dst) = setup(&[("doc1.txt", "1\t2\nw1\tw2\tclass\n5\t0\tcatA-catB\n")]);
    let summary = run(&config(&src, &dst, Some("-"))).unwrap();
    assert_eq!(summary.files, 1);
    assert_eq!(summary.outputs, 3);

    let combined = fs::read_to_string(dst.join("doc1.txt.arff")).unwrap();
    let first = fs::read_to_string(dst.join("doc1.txt_1st.arff")).unwrap();
    let second = fs::read_to_string(dst.join("doc1.txt_2nd.arff")).unwrap();
    assert_eq!(data_lines(&combined), vec!["{0 5, 2 'catA-catB'}"]);
    assert_eq!(data_lines(&first), vec!["{0 5, 2 'catA'}"]);
    assert_eq!(data_lines(&second), vec!["{0 5, 2 'catB'}"]);
    assert!(first.starts_with("@relation doc1.txt_1st.arff\n"));
}

#[test]
fn split_files() {
    let (_dir, src, dst) = setup(&[("news_1st-2nd_tf.txt", SPLIT_BAG)]);
    let summary = run(&config(&src, &dst, Some("-"))).unwrap();
    assert_eq!(summary.outputs, 3);

    let combined = fs::read_to_string(dst.join("news_1st-2nd_tf.txt.arff")).unwrap();
    let first = fs::read_to_string(dst.join("news_1st_tf.txt.arff")).unwrap();
    let second = fs::read_to_string(dst.join("news_2nd_tf.txt.arff")).unwrap();

    assert_eq!(
        combined,
        "@relation news_1st-2nd_tf.txt.arff\n\n\
         @attribute good numeric\n\
         @attribute bad numeric\n\
         @attribute ugly numeric\n\
         @attribute class_atr {'sport-football','politics-election','sport-tennis'}\n\n\
         @data\n\
         {0 1, 2 0.333333, 3 'sport-football'}\n\
         {3 'politics-election'}\n\
         {0 2, 1 4, 3 'sport-tennis'}\n\
         {0 0.5, 2 7, 3 'sport-football'}\n"
    );
    assert!(first.starts_with("@relation news_1st_tf.txt.arff\n"));
    assert!(second.starts_with("@relation news_2nd_tf.txt.arff\n"));
    assert_eq!(class_set(&first), vec!["'sport'", "'politics'"]);
    assert_eq!(
        class_set(&second),
        vec!["'football'", "'election'", "'tennis'"]
    );

    // combined label is first<token>second, row by row
    let rows = data_lines(&combined)
        .into_iter()
        .zip(data_lines(&first))
        .zip(data_lines(&second));
    for ((c, f), s) in rows {
        let strip = |l: String| l.trim_matches('\'').to_string();
        assert_eq!(
            strip(label(&c)),
            format!("{}-{}", strip(label(&f)), strip(label(&s)))
        );
        // features are the same in every file
        assert_eq!(pairs(&c)[..pairs(&c).len() - 1], pairs(&f)[..pairs(&f).len() - 1]);
    }
}

#[test]
fn structural_properties() {
    let (_dir, src, dst) = setup(&[("a_1st-2nd_b", SPLIT_BAG)]);
    run(&config(&src, &dst, Some("-"))).unwrap();

    for name in ["a_1st-2nd_b.arff", "a_1st_b.arff", "a_2nd_b.arff"] {
        let content = fs::read_to_string(dst.join(name)).unwrap();
        let rows = data_lines(&content);
        assert_eq!(rows.len(), 4);

        for row in &rows {
            let p = pairs(row);
            let (class, features) = p.split_last().unwrap();
            assert_eq!(class.0, 3);
            assert!(features.iter().all(|(col, _)| *col < 3));
        }

        let declared = class_set(&content);
        let declared_set: HashSet<_> = declared.iter().cloned().collect();
        assert_eq!(declared.len(), declared_set.len());

        // first-seen order
        let mut seen = Vec::new();
        for row in &rows {
            let l = label(row);
            if !seen.contains(&l) {
                seen.push(l);
            }
        }
        assert_eq!(declared, seen);
    }
}

#[test]
fn synthesized_names_without_token() {
    let (_dir, src, dst) = setup(&[("b.txt", SPLIT_BAG), ("a.txt", SPLIT_BAG)]);
    let mut config = config(&src, &dst, None);
    config.print_features = false;

    let summary = run(&config).unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.outputs, 2);

    let mut written: Vec<_> = fs::read_dir(&dst)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["a.txt.arff", "b.txt.arff"]);

    let content = fs::read_to_string(dst.join("a.txt.arff")).unwrap();
    assert!(content.contains(
        "@attribute f1 numeric\n@attribute f2 numeric\n@attribute f3 numeric\n"
    ));
}

#[test]
fn idempotent() {
    let (_dir, src, dst) = setup(&[("x_1st-2nd_y", SPLIT_BAG)]);
    let config = config(&src, &dst, Some("-"));

    run(&config).unwrap();
    let before = fs::read(dst.join("x_1st_y.arff")).unwrap();
    run(&config).unwrap();
    let after = fs::read(dst.join("x_1st_y.arff")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("arff");
    let result = run(&config(&dir.path().join("nope"), &dst, None));

    assert!(matches!(result, Err(Error::InputNotFound(_))));
    assert!(!dst.exists());
}

#[test_log::test]
fn malformed_file_aborts_batch() {
    let bad = "2 1\nw\tclass\n1\ta-b\n3\tnodelimiter\n";
    let (_dir, src, dst) = setup(&[("a.txt", bad), ("b.txt", SPLIT_BAG)]);

    match run(&config(&src, &dst, Some("-"))) {
        Err(Error::MalformedRecord { path, line, .. }) => {
            assert_eq!(path, src.join("a.txt"));
            assert_eq!(line, 4);
        }
        other => panic!("unexpected {:?}", other),
    }

    // nothing written for the bad file, and the batch stopped there
    assert!(!dst.join("a.txt.arff").exists());
    assert!(!dst.join("b.txt.arff").exists());
}

#[test]
fn empty_input_dir() {
    let (_dir, src, dst) = setup(&[]);
    let summary = run(&config(&src, &dst, Some("-"))).unwrap();
    assert_eq!(summary.files, 0);
    assert_eq!(summary.outputs, 0);
    assert!(dst.is_dir());
}

#[test]
fn unreadable_line_names_file_and_line() {
    let (_dir, src, dst) = setup(&[]);
    fs::write(
        src.join("bad_file.txt"),
        b"2 1\nw\tclass\n1\ta\n\xff\xfe\tb\n".as_slice(),
    )
    .unwrap();

    let err = run(&config(&src, &dst, None)).unwrap_err();
    match &err {
        Error::Read { path, line, .. } => {
            assert_eq!(path, &src.join("bad_file.txt"));
            assert_eq!(*line, 4);
        }
        other => panic!("unexpected {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("bad_file.txt"));
    assert!(message.contains("(line 4)"));
    assert!(!dst.join("bad_file.txt.arff").exists());
}

#[test]
fn empty_token_is_a_config_error() {
    let (_dir, src, dst) = setup(&[("a.txt", SPLIT_BAG)]);
    let result = run(&config(&src, &dst, Some("")));

    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert!(!dst.exists());
}
