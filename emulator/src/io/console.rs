
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Mutex;

// The machine's two byte ports, as a capability. Output must be visible as
// soon as it is written; input blocks until a byte arrives and reports end
// of input as None (the memory layer turns that into the sentinel byte).
pub trait Console: Send + Sync {
    fn handle_output(&self, val: u8) -> io::Result<()>;
    fn poll_input(&self) -> io::Result<Option<u8>>;
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn handle_output(&self, val: u8) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(&[val])?;
        out.flush()
    }

    fn poll_input(&self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        let mut inp = io::stdin().lock();
        loop {
            match inp.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub struct PipeConsole {
    out_buf: Mutex<VecDeque<u8>>,
    in_buf: Mutex<VecDeque<u8>>,
}

impl PipeConsole {
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.out_buf.lock().unwrap()).into()
    }

    pub fn is_out_empty(&self) -> bool {
        self.out_buf.lock().unwrap().is_empty()
    }

    pub fn push_input(&self, val: u8) {
        self.in_buf.lock().unwrap().push_back(val);
    }

    pub fn write_input(&self, vals: &[u8]) {
        for val in vals.iter() {
            self.push_input(*val);
        }
    }
}

impl Console for PipeConsole {
    fn handle_output(&self, val: u8) -> io::Result<()> {
        self.out_buf.lock().unwrap().push_back(val);
        Ok(())
    }

    // An empty buffer reads as end of input rather than blocking.
    fn poll_input(&self) -> io::Result<Option<u8>> {
        Ok(self.in_buf.lock().unwrap().pop_front())
    }
}
