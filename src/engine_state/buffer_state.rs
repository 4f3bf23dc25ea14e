//! # Buffer State Module
//!
//! Centralized management of GPU buffers. Buffers are registered under static
//! names and written through this one place, which bounds-checks every write
//! and keeps per-buffer usage analytics.

use std::cell::RefCell;
use std::collections::HashMap;

use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::StSystem;

/// Analytics data for a GPU buffer.
///
/// Tracks allocation, high-water usage, and write counts so oversized or
/// churning buffers show up in logs.
#[derive(Debug)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    allocated_memory: u64,
    /// High-water mark of bytes actually written
    used_memory: u64,
    /// Number of times the buffer has been written to
    times_written: u64,
}

/// Registry of named GPU buffers.
///
/// Buffer names double as debug labels. Writes go through [`write_buffer`],
/// which panics on an unknown name or an out-of-bounds write; both are
/// programming errors, not runtime conditions.
///
/// [`write_buffer`]: BufferState::write_buffer
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    /// Map of buffer names to buffer objects
    buffers: HashMap<&'static str, Buffer>,
    /// Analytics data for each buffer, behind a `RefCell` so reads of the
    /// registry can still update write counters
    buffer_analytics: RefCell<HashMap<&'static str, BufferAnalytics>>,
}

impl BufferState {
    /// Creates an empty buffer registry.
    ///
    /// # Arguments
    /// * `device` - Reference to the GPU device
    /// * `queue` - Reference to the GPU command queue
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: RefCell::new(HashMap::new()),
        }
    }

    /// Creates an empty buffer with the specified descriptor.
    ///
    /// # Arguments
    /// * `buffer_name` - Unique name for the buffer
    /// * `buffer_descriptor` - Buffer configuration descriptor
    pub fn create_buffer(
        &mut self,
        buffer_name: &'static str,
        buffer_descriptor: wgpu::BufferDescriptor,
    ) {
        let analytics = BufferAnalytics {
            allocated_memory: buffer_descriptor.size,
            used_memory: 0,
            times_written: 0,
        };
        let buffer = self.device.get().create_buffer(&buffer_descriptor);

        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics
            .borrow_mut()
            .insert(buffer_name, analytics);
    }

    /// Creates a buffer and initializes it with data.
    ///
    /// # Arguments
    /// * `buffer_name` - Unique name for the buffer
    /// * `init_descriptor` - Buffer initialization descriptor with data
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let analytics = BufferAnalytics {
            allocated_memory: init_descriptor.contents.len() as u64,
            used_memory: init_descriptor.contents.len() as u64,
            times_written: 1,
        };
        let buffer = self.device.get().create_buffer_init(&init_descriptor);

        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics
            .borrow_mut()
            .insert(buffer_name, analytics);
    }

    /// Writes raw byte data to a buffer.
    ///
    /// # Arguments
    /// * `buffer_name` - Name of the buffer to write to
    /// * `offset` - Byte offset in the buffer to start writing
    /// * `data` - Raw byte data to write
    ///
    /// # Panics
    /// Panics if the buffer does not exist or if the write would exceed
    /// buffer bounds.
    pub fn write_buffer(&self, buffer_name: &'static str, offset: wgpu::BufferAddress, data: &[u8]) {
        let buffer = self.buffers.get(buffer_name).unwrap();
        let mut analytics_map = self.buffer_analytics.borrow_mut();
        let analytics = analytics_map.get_mut(buffer_name).unwrap();

        let data_size = data.len() as u64;
        if offset + data_size > analytics.allocated_memory {
            panic!(
                "Buffer write out of bounds for buffer name '{}'",
                buffer_name
            );
        }

        self.queue.get().write_buffer(buffer, offset, data);
        analytics.used_memory = analytics.used_memory.max(offset + data_size);
        analytics.times_written += 1;
    }

    /// Gets a reference to a buffer by name.
    ///
    /// # Panics
    /// Panics if the buffer does not exist.
    pub fn get_buffer(&self, buffer_name: &'static str) -> &Buffer {
        self.buffers.get(buffer_name).unwrap()
    }

    /// Gets a binding resource for the entire buffer.
    ///
    /// # Panics
    /// Panics if the buffer does not exist.
    pub fn get_entire_binding(&self, buffer_name: &'static str) -> wgpu::BindingResource {
        self.buffers.get(buffer_name).unwrap().as_entire_binding()
    }

    /// Total allocated memory across all buffers in bytes.
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .borrow()
            .values()
            .fold(0, |acc, analytics| acc + analytics.allocated_memory)
    }

    /// Total high-water used memory across all buffers in bytes.
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .borrow()
            .values()
            .fold(0, |acc, analytics| acc + analytics.used_memory)
    }
}
