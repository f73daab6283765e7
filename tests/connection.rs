use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};

use ferrodis::connection::Connection;
use ferrodis::frame::Frame;

/// Binds a loopback listener whose accept side replays whatever the test
/// feeds through the channel, then connects a client to it. Lets the tests
/// control exactly how the byte stream is chunked.
async fn create_tcp_connection() -> Result<(UnboundedSender<Vec<u8>>, TcpStream), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let local_addr = listener.local_addr()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            while let Some(data) = rx.recv().await {
                if socket.write_all(&data).await.is_err() {
                    break;
                }
            }
            // Dropping the socket closes the stream, which the reader sees
            // as EOF.
        }
    });

    let stream = TcpStream::connect(local_addr).await?;

    Ok((tx, stream))
}

#[tokio::test]
async fn reads_a_command_array() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    tx.send(b"*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n".to_vec())
        .unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Bulk(Bytes::from("myvalue")),
    ]));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn reads_a_bulk_value_containing_crlf() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    tx.send(b"$9\r\nab\r\ncd\r\ne\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Bulk(Bytes::from_static(b"ab\r\ncd\r\ne"))));
}

#[tokio::test]
async fn reads_frames_in_order() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    tx.send(b"+OK\r\n".to_vec()).unwrap();
    tx.send(b":1000\r\n".to_vec()).unwrap();
    tx.send(b"$-1\r\n".to_vec()).unwrap();
    tx.send(b"-Error message\r\n".to_vec()).unwrap();

    assert_eq!(
        connection.read_frame().await.unwrap(),
        Some(Frame::Simple("OK".to_string()))
    );
    assert_eq!(
        connection.read_frame().await.unwrap(),
        Some(Frame::Integer(1000))
    );
    assert_eq!(connection.read_frame().await.unwrap(), Some(Frame::Null));
    assert_eq!(
        connection.read_frame().await.unwrap(),
        Some(Frame::Error("Error message".to_string()))
    );
}

#[tokio::test]
async fn buffers_partial_frames_until_complete() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    // One command split at awkward places, with delays between chunks.
    let parts: Vec<&[u8]> = vec![b"*3\r\n$3\r\nSE", b"T\r\n$5\r\nmyke", b"y\r\n$7\r\nmyvalue\r\n"];

    tokio::spawn(async move {
        for part in parts {
            tx.send(part.to_vec()).unwrap();
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    });

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Bulk(Bytes::from("myvalue")),
    ]));
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn clean_eof_between_frames_returns_none() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    tx.send(b"+OK\r\n".to_vec()).unwrap();
    assert_eq!(
        connection.read_frame().await.unwrap(),
        Some(Frame::Simple("OK".to_string()))
    );

    // Closing the channel makes the replay task drop the socket.
    drop(tx);
    assert_eq!(connection.read_frame().await.unwrap(), None);
}

#[tokio::test]
async fn eof_inside_a_frame_is_an_error() {
    let (tx, stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(stream);

    tx.send(b"$10\r\nabc".to_vec()).unwrap();
    drop(tx);

    assert!(connection.read_frame().await.is_err());
}

#[tokio::test]
async fn connections_get_distinct_ids() {
    let (_tx1, stream1) = create_tcp_connection().await.unwrap();
    let (_tx2, stream2) = create_tcp_connection().await.unwrap();

    let a = Connection::new(stream1);
    let b = Connection::new(stream2);
    assert_ne!(a.id, b.id);
}
