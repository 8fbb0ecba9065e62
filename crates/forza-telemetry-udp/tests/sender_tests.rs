//! Sender behaviour against loopback peers.

use std::io::Cursor;
use std::time::{Duration, Instant};

use forza_telemetry_udp::{
    CancelCause, CancelSignal, Operation, Outcome, ReplyPolicy, Sender, SenderConfig,
    TransportError, cancellation,
};
use tokio::net::UdpSocket;
use tokio::time::timeout;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const WAIT: Duration = Duration::from_secs(5);

async fn peer() -> Result<(UdpSocket, String), std::io::Error> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let endpoint = socket.local_addr()?.to_string();
    Ok((socket, endpoint))
}

#[tokio::test]
async fn silent_peer_times_out_after_read_deadline() -> TestResult {
    let (_silent, endpoint) = peer().await?;
    let deadline = Duration::from_millis(200);
    let sender = Sender::new(SenderConfig::new(endpoint).with_read_deadline(deadline));

    let started = Instant::now();
    let result = timeout(
        WAIT,
        sender.run(Cursor::new(b"hello".to_vec()), CancelSignal::never()),
    )
    .await?;
    let elapsed = started.elapsed();

    let Err(err) = result else {
        return Err("expected a timeout".into());
    };
    assert!(err.is_timeout());
    assert_eq!(err.operation(), Some(Operation::Receive));
    assert!(elapsed >= deadline, "returned after {elapsed:?}");
    assert!(elapsed < WAIT);
    Ok(())
}

#[tokio::test]
async fn optional_reply_completes_without_one() -> TestResult {
    let (_silent, endpoint) = peer().await?;
    let sender = Sender::new(
        SenderConfig::new(endpoint)
            .with_read_deadline(Duration::from_millis(100))
            .with_reply_policy(ReplyPolicy::Optional),
    );

    let outcome = timeout(
        WAIT,
        sender.run(Cursor::new(vec![7u8; 40]), CancelSignal::never()),
    )
    .await??;
    let Some(exchange) = outcome.completed() else {
        return Err("expected completion".into());
    };
    assert_eq!(exchange.bytes_written, 40);
    assert_eq!(exchange.datagrams_sent, 1);
    assert_eq!(exchange.reply, None);
    Ok(())
}

async fn closed_endpoint() -> Result<String, std::io::Error> {
    let (socket, endpoint) = peer().await?;
    drop(socket);
    Ok(endpoint)
}

#[tokio::test]
async fn closed_port_times_out_after_read_deadline() -> TestResult {
    let endpoint = closed_endpoint().await?;
    let deadline = Duration::from_millis(300);
    let sender = Sender::new(SenderConfig::new(endpoint).with_read_deadline(deadline));

    let started = Instant::now();
    let result = timeout(
        WAIT,
        sender.run(Cursor::new(vec![1u8; 64]), CancelSignal::never()),
    )
    .await?;
    let elapsed = started.elapsed();

    let Err(err) = result else {
        return Err("expected a timeout".into());
    };
    assert!(err.is_timeout(), "unexpected error: {err}");
    assert_eq!(err.operation(), Some(Operation::Receive));
    assert!(elapsed >= deadline, "returned after {elapsed:?}");
    Ok(())
}

#[tokio::test]
async fn closed_port_with_optional_reply_sends_every_chunk() -> TestResult {
    let endpoint = closed_endpoint().await?;
    let sender = Sender::new(
        SenderConfig::new(endpoint)
            .with_chunk_size(1024)
            .with_read_deadline(Duration::from_millis(100))
            .with_reply_policy(ReplyPolicy::Optional),
    );

    let outcome = timeout(
        WAIT,
        sender.run(Cursor::new(vec![3u8; 3000]), CancelSignal::never()),
    )
    .await??;
    let Some(exchange) = outcome.completed() else {
        return Err("expected completion".into());
    };
    assert_eq!(exchange.datagrams_sent, 3);
    assert_eq!(exchange.bytes_written, 3000);
    assert_eq!(exchange.reply, None);
    Ok(())
}

#[tokio::test]
async fn datagrams_from_other_sockets_are_not_replies() -> TestResult {
    let (silent, endpoint) = peer().await?;
    let (stranger, _) = peer().await?;
    let deadline = Duration::from_millis(300);
    let sender = Sender::new(SenderConfig::new(endpoint).with_read_deadline(deadline));
    let task = tokio::spawn(async move {
        sender
            .run(Cursor::new(b"ping".to_vec()), CancelSignal::never())
            .await
    });

    let mut buf = [0u8; 16];
    let (_, sender_addr) = timeout(WAIT, silent.recv_from(&mut buf)).await??;
    stranger.send_to(b"not yours", sender_addr).await?;

    let result = timeout(WAIT, task).await??;
    let Err(err) = result else {
        return Err("expected a timeout".into());
    };
    assert!(err.is_timeout(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn source_is_split_into_chunk_sized_datagrams() -> TestResult {
    let (responder, endpoint) = peer().await?;
    let sender = Sender::new(SenderConfig::new(endpoint).with_chunk_size(1024));
    let payload: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
    let task = tokio::spawn({
        let payload = payload.clone();
        async move { sender.run(Cursor::new(payload), CancelSignal::never()).await }
    });

    let mut received = Vec::new();
    let mut sizes = Vec::new();
    let mut buf = [0u8; 2048];
    let mut client = None;
    while received.len() < payload.len() {
        let (len, from) = timeout(WAIT, responder.recv_from(&mut buf)).await??;
        sizes.push(len);
        received.extend_from_slice(buf.get(..len).unwrap_or_default());
        client = Some(from);
    }
    assert_eq!(sizes, vec![1024, 1024, 452]);
    assert_eq!(received, payload);

    let client = client.ok_or("no datagrams received")?;
    responder.send_to(b"ack", client).await?;

    let outcome = timeout(WAIT, task).await???;
    let Outcome::Completed(exchange) = outcome else {
        return Err("expected completion".into());
    };
    assert_eq!(exchange.bytes_written, 2500);
    assert_eq!(exchange.datagrams_sent, 3);
    let reply = exchange.reply.ok_or("missing reply")?;
    assert_eq!(reply.payload, b"ack".to_vec());
    assert_eq!(reply.from, responder.local_addr()?);
    Ok(())
}

#[tokio::test]
async fn empty_source_still_waits_for_reply() -> TestResult {
    let (_silent, endpoint) = peer().await?;
    let sender = Sender::new(
        SenderConfig::new(endpoint)
            .with_read_deadline(Duration::from_millis(50))
            .with_reply_policy(ReplyPolicy::Optional),
    );
    let outcome = timeout(WAIT, sender.run(Cursor::new(Vec::new()), CancelSignal::never())).await??;
    let exchange = outcome.completed().ok_or("expected completion")?;
    assert_eq!(exchange.bytes_written, 0);
    assert_eq!(exchange.datagrams_sent, 0);
    Ok(())
}

#[tokio::test]
async fn cancellation_interrupts_reply_wait() -> TestResult {
    let (_silent, endpoint) = peer().await?;
    let sender = Sender::new(SenderConfig::new(endpoint));
    let (handle, signal) = cancellation();

    let started = Instant::now();
    let task = tokio::spawn(async move { sender.run(Cursor::new(b"x".to_vec()), signal).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel(CancelCause::Interrupted);

    let outcome = timeout(WAIT, task).await???;
    assert_eq!(outcome, Outcome::Cancelled(CancelCause::Interrupted));
    // Far below the 15 s read deadline.
    assert!(started.elapsed() < WAIT);
    Ok(())
}

#[tokio::test]
async fn missing_port_is_a_resolve_error() -> TestResult {
    let sender = Sender::new(SenderConfig::new("127.0.0.1"));
    let result = sender
        .run(Cursor::new(Vec::new()), CancelSignal::never())
        .await;
    let Err(err) = result else {
        return Err("endpoint without a port resolved".into());
    };
    assert!(err.is_initialization());
    assert!(matches!(err, TransportError::Resolve { ref endpoint, .. } if endpoint == "127.0.0.1"));
    Ok(())
}

#[tokio::test]
async fn failing_source_reports_bytes_written() -> TestResult {
    struct Failing {
        served: bool,
    }

    impl tokio::io::AsyncRead for Failing {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            if self.served {
                return std::task::Poll::Ready(Err(std::io::Error::other("disk gone")));
            }
            self.served = true;
            buf.put_slice(&[1, 2, 3, 4, 5]);
            std::task::Poll::Ready(Ok(()))
        }
    }

    let (_silent, endpoint) = peer().await?;
    let sender = Sender::new(SenderConfig::new(endpoint));
    let result = timeout(
        WAIT,
        sender.run(Failing { served: false }, CancelSignal::never()),
    )
    .await?;
    assert!(matches!(
        result,
        Err(TransportError::Io {
            operation: Operation::ReadSource,
            bytes_written: 5,
            ..
        })
    ));
    Ok(())
}
