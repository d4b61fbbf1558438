//! TCP 端到端测试：本地回环上的模拟 SMSC

use std::sync::Arc;

use smpp_executor::*;
use smpp_protocol::{decode, encode, Message, MessageType};
use smpp_transport::{TcpConnector, TransportConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_pdu(socket: &mut TcpStream) -> Message {
    let mut header = [0u8; 4];
    socket.read_exact(&mut header).await.unwrap();
    let len = u32::from_be_bytes(header) as usize;

    let mut frame = header.to_vec();
    frame.resize(len, 0);
    socket.read_exact(&mut frame[4..]).await.unwrap();
    decode(&frame).unwrap()
}

async fn write_pdu(socket: &mut TcpStream, message: &Message) {
    socket.write_all(&encode(message).unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_batch_against_loopback_smsc() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // SMSC：应答 enquire_link，然后推送一条 deliver_sm 并等待其响应
    let smsc = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let request = read_pdu(&mut socket).await;
        assert_eq!(request.message_type(), MessageType::EnquireLink);
        write_pdu(&mut socket, &request.response_to().unwrap()).await;

        let deliver = Message::new(MessageType::DeliverSm).with_sequence(5);
        write_pdu(&mut socket, &deliver).await;
        let reply = read_pdu(&mut socket).await;

        // 保持连接直到客户端主动断开
        let mut rest = Vec::new();
        socket.read_to_end(&mut rest).await.unwrap();
        reply
    });

    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.log");
    let log = Arc::new(EventLog::create(&transcript).unwrap().with_history(true));

    let runner = BatchRunner::new(
        Arc::new(TcpConnector::new(TransportConfig::default())),
        Arc::clone(&log),
    );
    let batch = ScriptCompiler::default()
        .compile_str(&format!(
            r#"<Batch>
                 <Connect><Server port="{}">127.0.0.1</Server></Connect>
                 <PDU type="ENQUIRE_LINK"/>
                 <Pause millis="300"/>
                 <Disconnect/>
               </Batch>"#,
            port
        ))
        .unwrap();

    let report = runner.run(&batch).await;
    assert!(report.is_completed());
    assert_eq!(report.final_sequence, 2);

    let reply = smsc.await.unwrap();
    assert_eq!(reply.message_type(), MessageType::DeliverSmResp);
    assert_eq!(reply.sequence_number, 5);

    let texts: Vec<String> = log.entries().into_iter().map(|e| e.text).collect();
    assert_eq!(texts[0], format!("Connected to 127.0.0.1:{}", port));
    assert!(texts.contains(&"Sent PDU, seq=1, type=ENQUIRE_LINK, status=ESME_ROK".to_string()));
    assert!(texts.contains(&"Received PDU, seq=1, type=ENQUIRE_LINK_RESP, status=ESME_ROK".to_string()));
    assert!(texts.contains(&"Received PDU, seq=5, type=DELIVER_SM, status=ESME_ROK".to_string()));
    assert!(texts.contains(&"Sent PDU, seq=5, type=DELIVER_SM_RESP, status=ESME_ROK".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("Disconnected"));
    // 主动断开不算连接丢失
    assert!(!texts.iter().any(|t| t == "Connection lost"));

    // 运行记录文件与内存中的日志一致
    let written = std::fs::read_to_string(&transcript).unwrap();
    let summaries: Vec<&str> = written
        .lines()
        .filter(|l| !l.starts_with("    "))
        .map(|l| l.split_once(' ').unwrap().1)
        .collect();
    assert_eq!(summaries, texts);
    assert!(written.contains("\n    Sequence=5\n    CommandStatus=ESME_ROK\n"));
}

#[tokio::test]
async fn test_peer_close_logged_as_connection_lost() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let smsc = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let log = Arc::new(EventLog::memory());
    let runner = BatchRunner::new(Arc::new(TcpConnector::default()), Arc::clone(&log));

    let mut batch = Batch::new();
    batch.add_connect("127.0.0.1", port);
    batch.add_pause(200).unwrap();
    batch.add_message(Message::new(MessageType::EnquireLink).with_sequence(1));

    let report = runner.run(&batch).await;
    smsc.await.unwrap();

    let texts: Vec<String> = log.entries().into_iter().map(|e| e.text).collect();
    assert!(texts.contains(&"Connection lost".to_string()));
    assert!(matches!(report.outcome, RunOutcome::Aborted { .. }));
}

#[tokio::test]
async fn test_connect_refused_continues() {
    // 绑定后立即释放，得到一个无人监听的端口
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let log = Arc::new(EventLog::memory());
    let runner = BatchRunner::new(Arc::new(TcpConnector::default()), Arc::clone(&log));

    let mut batch = Batch::new();
    batch.add_connect("127.0.0.1", port);
    batch.add_message(Message::new(MessageType::EnquireLink).with_sequence(1));
    batch.add_disconnect();

    let report = runner.run(&batch).await;
    assert!(report.is_completed());

    let texts: Vec<String> = log.entries().into_iter().map(|e| e.text).collect();
    assert!(texts[0].starts_with(&format!("Connect failed to 127.0.0.1:{}: ", port)));
    assert!(texts[1].starts_with("PDU not sent (not connected)"));
    assert_eq!(texts[2], "Disconnect failed (not connected)");
}
