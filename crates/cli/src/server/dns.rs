use hostsdns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const MAX_DATAGRAM_SIZE: usize = 4096;

pub async fn start_dns_server(
    socket_addr: SocketAddr,
    handler: DnsServerHandler,
    num_workers: usize,
) -> anyhow::Result<()> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(bind_address = %socket_addr, num_workers, "Starting DNS server with SO_REUSEPORT");

    let handler = Arc::new(handler);
    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..num_workers.max(1) {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        join_set.spawn(async move {
            run_udp_worker(udp_socket, handler_udp, i).await;
        });
    }

    info!("Serving DNS on {}/udp", socket_addr);

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_worker(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>, worker_id: usize) {
    let mut recv_buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(worker = worker_id, error = %e, "UDP recv error");
                continue;
            }
        };

        let handler_clone = handler.clone();
        let socket_clone = socket.clone();
        let owned_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        tokio::spawn(async move {
            let Some(response) = handler_clone.handle_raw_udp(&owned_buf, from.ip()).await else {
                return;
            };
            match socket_clone.send_to(&response, from).await {
                Ok(sent) => debug!(client = %from, bytes = sent, "Response sent"),
                Err(e) => warn!(client = %from, error = %e, "Failed to write response"),
            }
        });
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
