use std::{marker::PhantomData, mem::size_of};

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Strongly typed GPU buffer holding a single value.
#[derive(Debug, Clone)]
pub struct GpuBuffer<T> {
    inner: wgpu::Buffer,
    queue: wgpu::Queue,
    _marker: PhantomData<T>,
}

impl<T> GpuBuffer<T> {
    pub fn inner(&self) -> &wgpu::Buffer {
        &self.inner
    }
}

impl<T: Pod> GpuBuffer<T> {
    pub fn new_with_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        usages: wgpu::BufferUsages,
        data: &T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(data),
            usage: usages,
        });

        GpuBuffer {
            inner: buffer,
            queue: queue.clone(),
            _marker: PhantomData,
        }
    }

    pub fn write_data(&self, data: &T) {
        self.queue
            .write_buffer(&self.inner, 0, bytemuck::bytes_of(data));
    }
}

/// Strongly typed GPU buffer for an array that can be regrown.
#[derive(Debug)]
pub struct GpuBufferArray<T> {
    inner: wgpu::Buffer,
    queue: wgpu::Queue,
    label: String,
    usages: wgpu::BufferUsages,
    _marker: PhantomData<T>,
}

impl<T> GpuBufferArray<T> {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        usages: wgpu::BufferUsages,
        capacity: usize,
    ) -> Self {
        GpuBufferArray {
            inner: Self::create_buffer(device, label, usages, capacity),
            queue: queue.clone(),
            label: label.to_string(),
            usages,
            _marker: PhantomData,
        }
    }

    fn create_buffer(
        device: &wgpu::Device,
        label: &str,
        usages: wgpu::BufferUsages,
        capacity: usize,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            mapped_at_creation: false,
            size: (capacity.max(1) * size_of::<T>()) as u64,
            usage: usages,
        })
    }

    pub fn inner(&self) -> &wgpu::Buffer {
        &self.inner
    }

    pub fn capacity(&self) -> usize {
        self.inner.size() as usize / size_of::<T>()
    }

    /// Recreates the buffer if it can't hold `len` elements. Contents are not preserved.
    /// Returns whether the buffer was recreated.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, len: usize) -> bool {
        if len <= self.capacity() {
            return false;
        }

        self.inner = Self::create_buffer(device, &self.label, self.usages, len);
        true
    }
}

impl<T: Pod> GpuBufferArray<T> {
    pub fn write_data(&self, data: &[T]) {
        let byte_data: &[u8] = bytemuck::cast_slice(data);
        self.queue.write_buffer(&self.inner, 0, byte_data);
    }
}
