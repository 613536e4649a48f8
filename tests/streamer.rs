//! End-to-end replay over loopback UDP.

use row_streamer::{stream, PassStats, StreamError, Streamer, StreamerConfig};
use row_streamer_csv::{CsvRowsError, FIELD_NAMES};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const ROWS: [&str; 3] = [
    "Afghanistan,2015,Developing,65,263,0.01,71.28,65,19.1,8.16,0.1,584.26,33736494,0.479,10.1",
    "Afghanistan,2014,Developing,59.9,271,0.01,73.52,62,18.6,8.18,0.1,612.70,327582,0.476,10",
    "Albania,2015,Developing,77.8,74,4.6,364.98,99,58,6,0.1,3954.23,28873,0.762,14.2",
];

fn expected_message(row: &str) -> String {
    format!("[{}]", row.split(',').collect::<Vec<_>>().join(", "))
}

fn expected_line(row: &str) -> String {
    format!("b'{}'", expected_message(row))
}

fn write_dataset(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join("dataset.csv");
    let mut contents = FIELD_NAMES.join(",");
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(&path, contents).unwrap();
    path
}

async fn setup(rows: &[&str], delay: Duration) -> (TempDir, UdpSocket, StreamerConfig) {
    let dir = TempDir::new().unwrap();
    let input = write_dataset(dir.path(), rows);
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = StreamerConfig {
        input,
        output: dir.path().join("out.txt"),
        host: "127.0.0.1".to_string(),
        port: receiver.local_addr().unwrap().port(),
        delay,
    };
    (dir, receiver, config)
}

async fn recv(receiver: &UdpSocket) -> Option<String> {
    let mut buf = vec![0u8; 2048];
    let (n, _) = timeout(Duration::from_millis(500), receiver.recv_from(&mut buf))
        .await
        .ok()?
        .unwrap();
    Some(String::from_utf8(buf[..n].to_vec()).unwrap())
}

fn output_lines(config: &StreamerConfig) -> Vec<String> {
    std::fs::read_to_string(&config.output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_one_pass_sends_every_row_in_order() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(3)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();
    assert_eq!(streamer.dataset().len(), 3);

    let stats = streamer.run_pass().await.unwrap();

    let expected: Vec<String> = ROWS.iter().map(|r| expected_message(r)).collect();
    assert_eq!(
        stats,
        PassStats {
            records: 3,
            bytes: expected.iter().map(String::len).sum(),
        }
    );

    for message in &expected {
        assert_eq!(recv(&receiver).await.as_ref(), Some(message));
    }
    let lines: Vec<String> = ROWS.iter().map(|r| expected_line(r)).collect();
    assert_eq!(output_lines(&config), lines);
}

#[tokio::test]
async fn test_every_pass_resends_whole_dataset() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(3)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();

    for _ in 0..3 {
        assert_eq!(streamer.run_pass().await.unwrap().records, 3);
    }

    let lines = output_lines(&config);
    assert_eq!(lines.len(), 9);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &expected_line(ROWS[i % 3]));
        assert_eq!(recv(&receiver).await, Some(expected_message(ROWS[i % 3])));
    }
}

#[tokio::test]
async fn test_malformed_row_stops_the_stream() {
    let rows = [ROWS[0], "Albania,2015,Developing", ROWS[2]];
    let (_dir, receiver, config) = setup(&rows, Duration::from_secs(3)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();

    let err = streamer.run_pass().await.unwrap_err();
    assert!(matches!(
        err,
        StreamError::Rows(CsvRowsError::FieldCount {
            line: 3,
            expected: 15,
            found: 3,
        })
    ));

    assert_eq!(recv(&receiver).await, Some(expected_message(ROWS[0])));
    assert_eq!(recv(&receiver).await, None);
    assert_eq!(output_lines(&config), vec![expected_line(ROWS[0])]);
}

#[tokio::test]
async fn test_pauses_between_passes() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(60)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { streamer.run_until(shutdown).await }
    });

    for _ in 0..3 {
        assert!(recv(&receiver).await.is_some());
    }
    // Sleeping: the restart at row 1 has not happened yet.
    assert_eq!(recv(&receiver).await, None);

    shutdown.cancel();
    let passes = handle.await.unwrap().unwrap();
    assert_eq!(passes, 1);
    assert_eq!(output_lines(&config).len(), 3);
}

#[tokio::test]
async fn test_second_pass_restarts_at_first_row() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_millis(50)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { streamer.run_until(shutdown).await }
    });

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(recv(&receiver).await.unwrap());
    }
    assert_eq!(received[3], received[0]);
    assert_eq!(received[0], expected_message(ROWS[0]));

    shutdown.cancel();
    assert!(handle.await.unwrap().unwrap() >= 1);

    let lines = output_lines(&config);
    assert!(lines.len() >= 4);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &expected_line(ROWS[i % 3]));
    }
}

#[tokio::test]
async fn test_restart_truncates_output_and_begins_at_first_row() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(3)).await;

    let mut first = Streamer::open(config.clone()).await.unwrap();
    first.run_pass().await.unwrap();
    first.run_pass().await.unwrap();
    drop(first);
    assert_eq!(output_lines(&config).len(), 6);
    for _ in 0..6 {
        recv(&receiver).await.unwrap();
    }

    let mut second = Streamer::open(config.clone()).await.unwrap();
    assert_eq!(output_lines(&config).len(), 0);
    second.run_pass().await.unwrap();
    assert_eq!(recv(&receiver).await, Some(expected_message(ROWS[0])));
    assert_eq!(output_lines(&config).len(), 3);
}

#[tokio::test]
async fn test_header_only_dataset_keeps_looping() {
    let (_dir, receiver, config) = setup(&[], Duration::from_millis(20)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { streamer.run_until(shutdown).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    assert!(handle.await.unwrap().unwrap() >= 1);
    assert_eq!(recv(&receiver).await, None);
    assert!(output_lines(&config).is_empty());
}

#[tokio::test]
async fn test_missing_dataset_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let config = StreamerConfig {
        input: dir.path().join("missing.csv"),
        output: dir.path().join("out.txt"),
        host: "127.0.0.1".to_string(),
        port: 9999,
        delay: Duration::from_secs(3),
    };

    let err = Streamer::open(config).await.err().unwrap();
    assert!(matches!(err, StreamError::Rows(CsvRowsError::Open { .. })));
}

#[tokio::test]
async fn test_blank_line_stops_the_stream() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let contents = format!("{}\n{}\n\n{}\n", FIELD_NAMES.join(","), ROWS[0], ROWS[1]);
    std::fs::write(&input, contents).unwrap();
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = StreamerConfig {
        input,
        output: dir.path().join("out.txt"),
        host: "127.0.0.1".to_string(),
        port: receiver.local_addr().unwrap().port(),
        delay: Duration::from_secs(3),
    };
    let mut streamer = Streamer::open(config.clone()).await.unwrap();

    let err = streamer.run_pass().await.unwrap_err();
    assert!(matches!(
        err,
        StreamError::Rows(CsvRowsError::FieldCount {
            line: 3,
            expected: 15,
            found: 0,
        })
    ));

    assert_eq!(recv(&receiver).await, Some(expected_message(ROWS[0])));
    assert_eq!(recv(&receiver).await, None);
    assert_eq!(output_lines(&config), vec![expected_line(ROWS[0])]);
}

#[tokio::test]
async fn test_oversized_datagram_is_a_send_error() {
    let huge = format!(
        "Narnia,2015,Developing,{},263,0.01,71.28,65,19.1,8.16,0.1,584.26,1,0.4,10",
        "9".repeat(70_000)
    );
    let rows = [ROWS[0], huge.as_str()];
    let (_dir, receiver, config) = setup(&rows, Duration::from_secs(3)).await;
    let mut streamer = Streamer::open(config.clone()).await.unwrap();

    let err = streamer.run_pass().await.unwrap_err();
    assert!(matches!(err, StreamError::Send { .. }));

    assert_eq!(recv(&receiver).await, Some(expected_message(ROWS[0])));
    // The failed row is not recorded.
    assert_eq!(output_lines(&config), vec![expected_line(ROWS[0])]);
}

#[tokio::test]
async fn test_shutdown_before_open_sends_nothing() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(3)).await;
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let passes = stream(config.clone(), shutdown).await.unwrap();
    assert_eq!(passes, 0);
    assert_eq!(recv(&receiver).await, None);
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_stream_runs_until_cancelled() {
    let (_dir, receiver, config) = setup(&ROWS, Duration::from_secs(60)).await;
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(stream(config.clone(), shutdown.clone()));

    for row in ROWS {
        assert_eq!(recv(&receiver).await, Some(expected_message(row)));
    }
    shutdown.cancel();
    assert_eq!(handle.await.unwrap().unwrap(), 1);
    assert_eq!(output_lines(&config).len(), 3);
}
